//! Test point mapping.
//!
//! A test point `P = (x, y)` may be assigned to a selected candidate `C` when
//!
//! ```text
//! |y - C(x)| <= max_training_deviation(C) * √2
//! ```
//!
//! Among admissible candidates the smallest deviation wins; ties go to the
//! candidate that comes first in the pool, then to selection order. A point
//! with no admissible candidate is left unassigned, which is a normal outcome.
//!
//! `C(x)` is an exact grid lookup. An `x` that is not on a candidate's grid is
//! an input error for the whole call.

use rayon::prelude::*;

use crate::domain::{Assignment, Mapping, MappingResult, SelectionEntry, SelectionResult, Series, TestPoint};
use crate::error::FitError;
use crate::fit::axis::GridLookup;

/// A selection entry joined with its candidate grid.
struct Chosen<'a> {
    entry: &'a SelectionEntry,
    pool_index: usize,
    lookup: GridLookup<'a>,
}

/// Classify each test point against the selected candidates.
pub fn map(
    points: &[TestPoint],
    selection: &SelectionResult,
    pool: &[Series],
) -> Result<MappingResult, FitError> {
    if selection.is_empty() {
        return Err(FitError::EmptyInput { what: "selection result" });
    }
    let chosen = resolve_candidates(selection, pool)?;

    // Per-point results are collected first so that, when several points fail,
    // the reported error is the earliest one in input order.
    let per_point: Vec<Result<Mapping, FitError>> = points
        .par_iter()
        .enumerate()
        .map(|(index, p)| classify(index, *p, &chosen))
        .collect();

    let mappings = per_point.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(MappingResult { mappings })
}

fn resolve_candidates<'a>(
    selection: &'a SelectionResult,
    pool: &'a [Series],
) -> Result<Vec<Chosen<'a>>, FitError> {
    selection
        .entries
        .iter()
        .map(|entry| {
            let pool_index = entry.pool_index(pool).ok_or_else(|| FitError::UnknownCandidate {
                candidate: entry.candidate_id.clone(),
            })?;
            Ok(Chosen {
                entry,
                pool_index,
                lookup: GridLookup::new(&pool[pool_index]),
            })
        })
        .collect()
}

fn classify(index: usize, point: TestPoint, chosen: &[Chosen<'_>]) -> Result<Mapping, FitError> {
    let mut best: Option<(&Chosen<'_>, f64)> = None;

    for c in chosen {
        let y_fit = c.lookup.value_at(point.x).ok_or_else(|| FitError::OutOfDomain {
            index,
            x: point.x,
            y: point.y,
            candidate: c.entry.candidate_id.clone(),
        })?;

        let deviation = (point.y - y_fit).abs();
        let admissible = deviation <= c.entry.admission_threshold();
        if !admissible {
            continue;
        }

        let better = match best {
            None => true,
            Some((b, d)) => deviation < d || (deviation == d && c.pool_index < b.pool_index),
        };
        if better {
            best = Some((c, deviation));
        }
    }

    Ok(Mapping {
        point,
        assignment: best.map(|(c, deviation)| Assignment {
            candidate_id: c.entry.candidate_id.clone(),
            training_id: c.entry.training_id.clone(),
            deviation,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn entry(training: &str, candidate: &str, index: usize, max_dev: f64) -> SelectionEntry {
        SelectionEntry {
            training_id: training.to_string(),
            candidate_id: candidate.to_string(),
            candidate_index: index,
            sum_squared_deviation: 0.0,
            max_training_deviation: max_dev,
        }
    }

    fn pool() -> Vec<Series> {
        vec![
            Series::from_pairs("c1", &[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]),
            Series::from_pairs("c2", &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]),
            Series::from_pairs("c3", &[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]),
        ]
    }

    #[test]
    fn assigns_within_threshold() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c1", 0, 1.0)],
        };
        let result = map(&[Point::new(2.0, 5.4)], &selection, &pool()).unwrap();
        let a = result.mappings[0].assignment.as_ref().unwrap();
        assert_eq!(a.candidate_id, "c1");
        assert_eq!(a.training_id, "t1");
        assert!((a.deviation - 1.4).abs() < 1e-12);
    }

    #[test]
    fn rejects_beyond_threshold() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c1", 0, 1.0)],
        };
        let result = map(&[Point::new(2.0, 5.5)], &selection, &pool()).unwrap();
        assert!(!result.mappings[0].assigned());
    }

    #[test]
    fn threshold_is_inclusive() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c2", 1, 0.5)],
        };
        let threshold = 0.5 * std::f64::consts::SQRT_2;
        let result = map(&[Point::new(1.0, threshold)], &selection, &pool()).unwrap();
        assert!(result.mappings[0].assigned());
    }

    #[test]
    fn smallest_deviation_wins() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c1", 0, 10.0), entry("t2", "c3", 2, 10.0)],
        };
        // |4.8 - 4| = 0.8, |4.8 - 5| = 0.2
        let result = map(&[Point::new(2.0, 4.8)], &selection, &pool()).unwrap();
        assert_eq!(result.mappings[0].assignment.as_ref().unwrap().candidate_id, "c3");
    }

    #[test]
    fn equal_deviation_prefers_lower_pool_index() {
        // Selection lists c3 first, but c1 comes first in the pool.
        let selection = SelectionResult {
            entries: vec![entry("t2", "c3", 2, 10.0), entry("t1", "c1", 0, 10.0)],
        };
        let result = map(&[Point::new(2.0, 4.5)], &selection, &pool()).unwrap();
        assert_eq!(result.mappings[0].assignment.as_ref().unwrap().candidate_id, "c1");
    }

    #[test]
    fn shared_candidate_uses_each_entry_threshold() {
        // Both training series chose c1, with thresholds ~0.71 and ~2.83.
        let selection = SelectionResult {
            entries: vec![entry("t1", "c1", 0, 0.5), entry("t2", "c1", 0, 2.0)],
        };
        let points = [
            Point::new(2.0, 4.5), // d = 0.5, both admit
            Point::new(2.0, 5.0), // d = 1.0, only t2 admits
            Point::new(2.0, 7.0), // d = 3.0, neither
        ];
        let result = map(&points, &selection, &pool()).unwrap();

        let both = result.mappings[0].assignment.as_ref().unwrap();
        assert_eq!((both.candidate_id.as_str(), both.training_id.as_str()), ("c1", "t1"));

        let wide = result.mappings[1].assignment.as_ref().unwrap();
        assert_eq!((wide.candidate_id.as_str(), wide.training_id.as_str()), ("c1", "t2"));
        assert_eq!(wide.deviation, 1.0);

        assert!(!result.mappings[2].assigned());
    }

    #[test]
    fn recorded_index_wins_over_first_id_match() {
        let pool = vec![
            Series::from_pairs("y1", &[(0.0, 0.0), (1.0, 0.0)]),
            Series::from_pairs("y1", &[(0.0, 2.0), (1.0, 4.0)]),
        ];
        let selection = SelectionResult {
            entries: vec![entry("t1", "y1", 1, 0.0)],
        };
        let result = map(&[Point::new(1.0, 4.0)], &selection, &pool).unwrap();
        assert_eq!(result.mappings[0].assignment.as_ref().unwrap().deviation, 0.0);
    }

    #[test]
    fn stale_index_falls_back_to_id() {
        // Index 0 is c1 now; the entry names c3.
        let selection = SelectionResult {
            entries: vec![entry("t1", "c3", 0, 0.0)],
        };
        let result = map(&[Point::new(2.0, 5.0)], &selection, &pool()).unwrap();
        assert_eq!(result.mappings[0].assignment.as_ref().unwrap().candidate_id, "c3");
    }

    #[test]
    fn unknown_candidate_is_an_error() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c9", 8, 1.0)],
        };
        let err = map(&[Point::new(1.0, 1.0)], &selection, &pool()).unwrap_err();
        assert_eq!(err, FitError::UnknownCandidate { candidate: "c9".to_string() });
    }

    #[test]
    fn earliest_out_of_domain_point_is_reported() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c1", 0, 1.0)],
        };
        let points = [
            Point::new(1.0, 2.0),
            Point::new(1.5, 3.0),
            Point::new(9.0, 3.0),
        ];
        let err = map(&points, &selection, &pool()).unwrap_err();
        assert_eq!(
            err,
            FitError::OutOfDomain {
                index: 1,
                x: 1.5,
                y: 3.0,
                candidate: "c1".to_string()
            }
        );
    }

    #[test]
    fn empty_selection_is_an_error() {
        let err = map(&[Point::new(1.0, 1.0)], &SelectionResult::default(), &pool()).unwrap_err();
        assert!(matches!(err, FitError::EmptyInput { .. }));
    }

    #[test]
    fn no_points_gives_empty_result() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c1", 0, 1.0)],
        };
        let result = map(&[], &selection, &pool()).unwrap();
        assert!(result.is_empty());
    }
}
