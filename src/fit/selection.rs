//! Ideal function selection.
//!
//! For each training series `T` we score every candidate `C` in the pool with
//!
//! ```text
//! SSE(T, C) = Σ (T.y_i - C.y_i)^2
//! ```
//!
//! and keep the minimum. Ties go to the candidate that appears first in the
//! pool. The chosen pair then gets a separate pass for the largest absolute
//! pointwise deviation, which later becomes the admission threshold basis for
//! test points.
//!
//! Training series are independent, so they are scored in parallel; output
//! order always follows the training set.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::domain::{SelectionEntry, SelectionResult, Series};
use crate::error::FitError;
use crate::fit::axis::ensure_aligned;
use crate::math::{max_abs_deviation, sum_squared_deviation};

/// Running best candidate during the pool scan.
#[derive(Debug, Clone, Copy)]
struct Best {
    index: usize,
    sse: f64,
}

/// Select the best-fitting candidate for each training series.
pub fn select(training: &[Series], pool: &[Series]) -> Result<SelectionResult, FitError> {
    validate_inputs(training, pool)?;

    let entries = training
        .par_iter()
        .map(|t| best_match(t, pool))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SelectionResult { entries })
}

/// Full `training × pool` SSE matrix (rows follow `training`, columns follow `pool`).
///
/// Used for diagnostics; [`select`] never materializes it.
pub fn score_matrix(training: &[Series], pool: &[Series]) -> Result<Vec<Vec<f64>>, FitError> {
    validate_inputs(training, pool)?;

    Ok(training
        .par_iter()
        .map(|t| pool.iter().map(|c| sum_squared_deviation(t, c)).collect())
        .collect())
}

fn validate_inputs(training: &[Series], pool: &[Series]) -> Result<(), FitError> {
    let Some(reference) = training.first() else {
        return Err(FitError::EmptyInput { what: "training set" });
    };
    if pool.is_empty() {
        return Err(FitError::EmptyInput { what: "candidate pool" });
    }
    if reference.is_empty() {
        return Err(FitError::EmptyInput { what: "shared x-axis" });
    }

    ensure_unique_ids("training", training)?;
    ensure_unique_ids("candidate", pool)?;
    ensure_aligned(reference, training.iter().chain(pool.iter()))
}

fn ensure_unique_ids(collection: &'static str, series: &[Series]) -> Result<(), FitError> {
    let mut seen = HashSet::with_capacity(series.len());
    match series.iter().find(|s| !seen.insert(s.id.as_str())) {
        Some(dup) => Err(FitError::DuplicateId {
            collection,
            id: dup.id.clone(),
        }),
        None => Ok(()),
    }
}

fn best_match(training: &Series, pool: &[Series]) -> Result<SelectionEntry, FitError> {
    let best = pool
        .iter()
        .enumerate()
        .map(|(index, c)| Best {
            index,
            sse: sum_squared_deviation(training, c),
        })
        .fold(None, |acc: Option<Best>, cur| match acc {
            // Keep the earlier candidate on ties; a NaN score never replaces a number.
            Some(b) if b.sse <= cur.sse || cur.sse.is_nan() => Some(b),
            _ => Some(cur),
        })
        .ok_or(FitError::EmptyInput { what: "candidate pool" })?;

    let chosen = &pool[best.index];

    Ok(SelectionEntry {
        training_id: training.id.clone(),
        candidate_id: chosen.id.clone(),
        candidate_index: best.index,
        sum_squared_deviation: best.sse,
        max_training_deviation: max_abs_deviation(training, chosen),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(id: &str, ys: &[f64]) -> Series {
        let pairs: Vec<(f64, f64)> = ys.iter().enumerate().map(|(i, &y)| (i as f64, y)).collect();
        Series::from_pairs(id, &pairs)
    }

    #[test]
    fn picks_exact_match() {
        let training = vec![series("t1", &[2.0, 4.0, 6.0])];
        let pool = vec![series("c1", &[0.0, 0.0, 0.0]), series("c2", &[2.0, 4.0, 6.0])];

        let result = select(&training, &pool).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.entries[0].candidate_id, "c2");
        assert_eq!(result.entries[0].candidate_index, 1);
        assert_eq!(result.entries[0].max_training_deviation, 0.0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let training = vec![series("t1", &[2.0, 4.0])];
        let pool = vec![series("y1", &[0.0, 0.0]), series("y1", &[2.0, 4.0])];
        assert_eq!(
            select(&training, &pool),
            Err(FitError::DuplicateId {
                collection: "candidate",
                id: "y1".to_string()
            })
        );

        let twice = vec![series("t1", &[2.0, 4.0]), series("t1", &[0.0, 0.0])];
        assert!(matches!(
            select(&twice, &pool[1..]),
            Err(FitError::DuplicateId { collection: "training", .. })
        ));
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let training = vec![series("t1", &[1.0, 1.0])];
        let pool = vec![
            series("c1", &[0.0, 0.0]),
            series("c2", &[2.0, 2.0]),
            series("c3", &[0.0, 0.0]),
        ];

        let result = select(&training, &pool).unwrap();
        assert_eq!(result.entries[0].candidate_id, "c1");
        assert!((result.entries[0].sum_squared_deviation - 2.0).abs() < 1e-12);
    }

    #[test]
    fn max_deviation_is_separate_from_sse() {
        // c1: SSE = 0.25 + 0.25 + 9 = 9.5, max = 3
        // c2: SSE = 4 + 4 + 4 = 12,        max = 2
        let training = vec![series("t1", &[1.0, 1.0, 1.0])];
        let pool = vec![series("c1", &[1.5, 0.5, 4.0]), series("c2", &[3.0, 3.0, 3.0])];

        let result = select(&training, &pool).unwrap();
        let e = &result.entries[0];
        assert_eq!(e.candidate_id, "c1");
        assert!((e.sum_squared_deviation - 9.5).abs() < 1e-12);
        assert!((e.max_training_deviation - 3.0).abs() < 1e-12);
    }

    #[test]
    fn candidates_may_repeat_across_training_series() {
        let training = vec![series("t1", &[1.0, 2.0]), series("t2", &[1.1, 2.1])];
        let pool = vec![series("c1", &[1.0, 2.0]), series("c2", &[9.0, 9.0])];

        let result = select(&training, &pool).unwrap();
        let ids: Vec<&str> = result.entries.iter().map(|e| e.candidate_id.as_str()).collect();
        assert_eq!(ids, ["c1", "c1"]);
        let training_ids: Vec<&str> = result.entries.iter().map(|e| e.training_id.as_str()).collect();
        assert_eq!(training_ids, ["t1", "t2"]);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let s = vec![series("t1", &[1.0])];
        assert_eq!(
            select(&[], &s).unwrap_err(),
            FitError::EmptyInput { what: "training set" }
        );
        assert_eq!(
            select(&s, &[]).unwrap_err(),
            FitError::EmptyInput { what: "candidate pool" }
        );
        assert_eq!(
            select(&[series("t1", &[])], &s).unwrap_err(),
            FitError::EmptyInput { what: "shared x-axis" }
        );
    }

    #[test]
    fn misaligned_candidate_is_rejected() {
        let training = vec![series("t1", &[1.0, 2.0, 3.0])];
        let pool = vec![series("c1", &[1.0, 2.0, 3.0]), series("c2", &[1.0, 2.0])];

        let err = select(&training, &pool).unwrap_err();
        assert!(matches!(err, FitError::Alignment { ref series, .. } if series == "c2"));
    }

    #[test]
    fn score_matrix_matches_selection() {
        let training = vec![series("t1", &[1.0, 2.0]), series("t2", &[5.0, 5.0])];
        let pool = vec![series("c1", &[1.0, 2.5]), series("c2", &[5.0, 4.0])];

        let matrix = score_matrix(&training, &pool).unwrap();
        let result = select(&training, &pool).unwrap();
        for (row, entry) in matrix.iter().zip(&result.entries) {
            assert_eq!(row[entry.candidate_index], entry.sum_squared_deviation);
            assert!(row.iter().all(|&v| v >= entry.sum_squared_deviation));
        }
    }
}
