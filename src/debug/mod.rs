//! Debug bundle writer for inspecting selection scores.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{SelectionResult, Series};
use crate::error::AppError;
use crate::fit::selection::score_matrix;

/// Write `ideal_debug_<dataset>_<timestamp>.md` into `dir` and return its path.
///
/// Contains the full SSE matrix (training x candidate) so every choice can be
/// checked by eye, plus the chosen candidate and max deviation per training series.
pub fn write_debug_bundle(
    dir: &Path,
    dataset: &str,
    training: &[Series],
    pool: &[Series],
    selection: &SelectionResult,
) -> Result<PathBuf, AppError> {
    let matrix = score_matrix(training, pool)?;

    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("ideal_debug_{}_{ts}.md", sanitize(dataset)));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;

    w(&mut file, format_args!("# ideal debug bundle\n"))?;
    w(&mut file, format_args!("- dataset: {dataset}\n"))?;
    w(&mut file, format_args!("- training series: {}\n", training.len()))?;
    w(&mut file, format_args!("- candidates: {}\n", pool.len()))?;
    w(&mut file, format_args!("- generated: {}\n", Local::now().to_rfc3339()))?;

    w(&mut file, format_args!("\n## Selection\n"))?;
    w(&mut file, format_args!("| training | ideal | sse | max_dev | threshold |\n"))?;
    w(&mut file, format_args!("| - | - | - | - | - |\n"))?;
    for e in &selection.entries {
        w(
            &mut file,
            format_args!(
                "| {} | {} | {:.6} | {:.6} | {:.6} |\n",
                e.training_id,
                e.candidate_id,
                e.sum_squared_deviation,
                e.max_training_deviation,
                e.admission_threshold()
            ),
        )?;
    }

    w(&mut file, format_args!("\n## SSE matrix\n"))?;
    let header: Vec<&str> = training.iter().map(|t| t.id.as_str()).collect();
    w(&mut file, format_args!("| candidate | {} |\n", header.join(" | ")))?;
    w(&mut file, format_args!("|{}\n", " - |".repeat(training.len() + 1)))?;
    for (j, candidate) in pool.iter().enumerate() {
        let cells: Vec<String> = matrix
            .iter()
            .zip(&selection.entries)
            .map(|(row, e)| {
                let cell = fmt_score(row[j]);
                if e.candidate_index == j { format!("**{cell}**") } else { cell }
            })
            .collect();
        w(&mut file, format_args!("| {} | {} |\n", candidate.id, cells.join(" | ")))?;
    }

    log::info!("Debug bundle written to {}", path.display());
    Ok(path)
}

fn w(file: &mut File, args: std::fmt::Arguments<'_>) -> Result<(), AppError> {
    file.write_fmt(args)
        .map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))
}

fn fmt_score(value: f64) -> String {
    if value.is_finite() { format!("{value:.4}") } else { "-".to_string() }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::select;

    #[test]
    fn bundle_contains_matrix_and_highlights_choice() {
        let training = vec![Series::from_pairs("y1", &[(0.0, 1.0), (1.0, 2.0)])];
        let pool = vec![
            Series::from_pairs("c1", &[(0.0, 5.0), (1.0, 5.0)]),
            Series::from_pairs("c2", &[(0.0, 1.0), (1.0, 2.5)]),
        ];
        let selection = select(&training, &pool).unwrap();

        let dir = std::env::temp_dir().join(format!("ideal_debug_test_{}", std::process::id()));
        let path = write_debug_bundle(&dir, "My Set", &training, &pool, &selection).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("ideal_debug_My_Set_"));
        assert!(text.contains("| y1 | c2 | 0.250000 | 0.500000 |"));
        assert!(text.contains("| c1 | 25.0000 |"));
        assert!(text.contains("| c2 | **0.2500** |"));
    }

    #[test]
    fn failed_scoring_leaves_no_file() {
        let training = vec![Series::from_pairs("y1", &[(0.0, 1.0), (1.0, 2.0)])];
        let misaligned = vec![Series::from_pairs("c1", &[(0.0, 1.0), (2.0, 2.0)])];
        let selection = SelectionResult::default();

        let dir = std::env::temp_dir().join(format!("ideal_debug_fail_{}", std::process::id()));
        let err = write_debug_bundle(&dir, "Broken", &training, &misaligned, &selection).unwrap_err();
        let created = dir.exists();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(err.exit_code(), 4);
        assert!(!created);
    }
}
