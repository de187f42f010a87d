//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the selection/mapping code stays clean and testable
//! - output changes are localized

use crate::domain::{ADMISSION_FACTOR, MappingResult, SelectionResult, Series};
use crate::io::ingest::DatasetStats;
use crate::math::LinearTrend;
use crate::report::MappingSummary;

/// Format the selection summary (dataset stats + one line per training series).
pub fn format_selection_summary(
    dataset: &str,
    training_stats: &DatasetStats,
    n_candidates: usize,
    selection: &SelectionResult,
    trends: &[Option<LinearTrend>],
) -> String {
    let mut out = String::new();

    out.push_str("=== ideal - Ideal Function Selection ===\n");
    out.push_str(&format!("Dataset: {dataset}\n"));
    out.push_str(&format!(
        "Training: {} series | x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}]\n",
        selection.len(),
        training_stats.x_min,
        training_stats.x_max,
        training_stats.y_min,
        training_stats.y_max,
    ));
    out.push_str(&format!("Candidates: {n_candidates}\n"));
    out.push_str(&format!("Admission factor: {ADMISSION_FACTOR:.6} (sqrt 2)\n"));

    out.push_str("\nSelected ideal functions:\n");
    out.push_str(
        format!(
            "{:<12} {:<12} {:>14} {:>12} {:>12}  {}\n",
            "training", "ideal", "SSE", "max_dev", "threshold", "trend"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<12} {:-<14} {:-<12} {:-<12}  {:-<5}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, e) in selection.entries.iter().enumerate() {
        let trend = trends.get(i).copied().flatten();
        out.push_str(
            format!(
                "{:<12} {:<12} {:>14.4} {:>12.4} {:>12.4}  {}\n",
                truncate(&e.training_id, 12),
                truncate(&e.candidate_id, 12),
                e.sum_squared_deviation,
                e.max_training_deviation,
                e.admission_threshold(),
                fmt_trend(trend),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the mapping table. `limit` caps the number of rows shown.
pub fn format_mapping_table(mapping: &MappingResult, limit: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>12} {:>12} {:>12} {:<12} {:<12}\n",
            "x", "y", "delta_y", "ideal", "training"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<12} {:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    let shown = limit.unwrap_or(mapping.len()).min(mapping.len());
    for m in mapping.mappings.iter().take(shown) {
        let line = match &m.assignment {
            Some(a) => format!(
                "{:>12.4} {:>12.4} {:>12.4} {:<12} {:<12}",
                m.point.x,
                m.point.y,
                a.deviation,
                truncate(&a.candidate_id, 12),
                truncate(&a.training_id, 12),
            ),
            None => format!("{:>12.4} {:>12.4} {:>12} {:<12}", m.point.x, m.point.y, "-", "(unassigned)"),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if shown < mapping.len() {
        out.push_str(&format!("... {} more row(s)\n", mapping.len() - shown));
    }

    out
}

/// Format mapping counts.
pub fn format_mapping_summary(summary: &MappingSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Test points: {} | assigned: {} | unassigned: {}\n",
        summary.total, summary.assigned, summary.unassigned
    ));
    for (candidate, n) in &summary.per_candidate {
        out.push_str(&format!("- {candidate}: {n}\n"));
    }
    out
}

/// Format series sharing one x column as a table (`x` then one column per series).
///
/// Rows follow the first series; `limit` caps the number of rows shown.
pub fn format_series_table(series: &[Series], limit: Option<usize>) -> String {
    let mut out = String::new();
    let Some(first) = series.first() else {
        out.push_str("(no series)\n");
        return out;
    };

    let mut header = format!("{:>12}", "x");
    let mut rule = format!("{:-<12}", "");
    for s in series {
        header.push_str(&format!(" {:>12}", truncate(&s.id, 12)));
        rule.push_str(&format!(" {:-<12}", ""));
    }
    out.push_str(&header);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    let shown = limit.unwrap_or(first.len()).min(first.len());
    for (i, p) in first.points.iter().take(shown).enumerate() {
        let mut line = format!("{:>12.4}", p.x);
        for s in series {
            match s.points.get(i) {
                Some(q) => line.push_str(&format!(" {:>12.4}", q.y)),
                None => line.push_str(&format!(" {:>12}", "-")),
            }
        }
        out.push_str(&line);
        out.push('\n');
    }
    if shown < first.len() {
        out.push_str(&format!("... {} more row(s)\n", first.len() - shown));
    }

    out
}

fn fmt_trend(trend: Option<LinearTrend>) -> String {
    match trend {
        Some(t) => format!(
            "y = {:.4} {} {:.4}x (R2={:.3})",
            t.intercept,
            if t.slope < 0.0 { '-' } else { '+' },
            t.slope.abs(),
            t.r_squared
        ),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
