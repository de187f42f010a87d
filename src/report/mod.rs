//! Reporting utilities: per-selection trends and mapping summaries.

pub mod format;

pub use format::*;

use crate::domain::{MappingResult, SelectionResult, Series};
use crate::math::{LinearTrend, linear_trend};

/// Mapping counts (overall and per selected candidate).
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSummary {
    pub total: usize,
    pub assigned: usize,
    pub unassigned: usize,
    /// `(candidate_id, assigned points)` in selection order, one row per distinct candidate.
    pub per_candidate: Vec<(String, usize)>,
}

/// Straight-line trend of each selected candidate (selection order).
///
/// `None` where the candidate is missing from the pool or too short to fit.
pub fn selection_trends(selection: &SelectionResult, pool: &[Series]) -> Vec<Option<LinearTrend>> {
    selection
        .entries
        .iter()
        .map(|e| e.candidate_in(pool).and_then(linear_trend))
        .collect()
}

/// Count assigned/unassigned points and assignments per candidate.
pub fn summarize_mapping(mapping: &MappingResult, selection: &SelectionResult) -> MappingSummary {
    let mut per_candidate: Vec<(String, usize)> = Vec::new();
    for e in &selection.entries {
        if !per_candidate.iter().any(|(id, _)| id == &e.candidate_id) {
            per_candidate.push((e.candidate_id.clone(), 0));
        }
    }

    for (_, a) in mapping.assigned() {
        match per_candidate.iter_mut().find(|(id, _)| id == &a.candidate_id) {
            Some((_, n)) => *n += 1,
            None => per_candidate.push((a.candidate_id.clone(), 1)),
        }
    }

    let assigned = mapping.assigned_count();
    MappingSummary {
        total: mapping.len(),
        assigned,
        unassigned: mapping.len() - assigned,
        per_candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assignment, Mapping, Point, SelectionEntry};

    fn entry(training: &str, candidate: &str) -> SelectionEntry {
        SelectionEntry {
            training_id: training.to_string(),
            candidate_id: candidate.to_string(),
            candidate_index: 0,
            sum_squared_deviation: 0.0,
            max_training_deviation: 1.0,
        }
    }

    fn mapped(candidate: Option<&str>) -> Mapping {
        Mapping {
            point: Point::new(0.0, 0.0),
            assignment: candidate.map(|c| Assignment {
                candidate_id: c.to_string(),
                training_id: "t".to_string(),
                deviation: 0.0,
            }),
        }
    }

    #[test]
    fn summary_counts_per_candidate() {
        let selection = SelectionResult {
            entries: vec![entry("t1", "c2"), entry("t2", "c1"), entry("t3", "c2")],
        };
        let mapping = MappingResult {
            mappings: vec![mapped(Some("c2")), mapped(None), mapped(Some("c2")), mapped(Some("c1"))],
        };

        let summary = summarize_mapping(&mapping, &selection);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.assigned, 3);
        assert_eq!(summary.unassigned, 1);
        assert_eq!(
            summary.per_candidate,
            vec![("c2".to_string(), 2), ("c1".to_string(), 1)]
        );
    }

    #[test]
    fn trends_follow_selection_order() {
        let pool = vec![
            Series::from_pairs("c1", &[(0.0, 1.0), (1.0, 3.0)]),
            Series::from_pairs("c2", &[(0.0, 5.0), (1.0, 5.0)]),
        ];
        let selection = SelectionResult {
            entries: vec![entry("t1", "c2"), entry("t2", "c1"), entry("t3", "zz")],
        };

        let trends = selection_trends(&selection, &pool);
        assert!((trends[0].unwrap().slope).abs() < 1e-9);
        assert!((trends[1].unwrap().slope - 2.0).abs() < 1e-9);
        assert!(trends[2].is_none());
    }
}
