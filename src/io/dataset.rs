//! Dataset layout on disk.
//!
//! A dataset is a directory holding three CSV files:
//!
//! ```text
//! <data_dir>/<dataset>/train.csv   x,y1,y2,...   training series
//! <data_dir>/<dataset>/ideal.csv   x,y1,...,yN   candidate pool
//! <data_dir>/<dataset>/test.csv    x,y           test points
//! ```

use std::fs;
use std::path::Path;

use crate::domain::{DataConfig, DatasetKind};
use crate::error::AppError;
use crate::io::ingest::{TestTable, SeriesTable, load_test_points, load_series_file};

/// Everything loaded for one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub config: DataConfig,
    pub training: SeriesTable,
    pub ideal: SeriesTable,
    /// Absent when only selection was requested.
    pub test: Option<TestTable>,
}

/// Load training data, the candidate pool and (optionally) the test points.
pub fn load_dataset(config: &DataConfig, with_test: bool) -> Result<Dataset, AppError> {
    let dir = config.dataset_dir();
    if !dir.is_dir() {
        return Err(AppError::new(
            2,
            format!("Dataset directory '{}' not found.", dir.display()),
        ));
    }

    let training = load_series_file(&config.path_for(DatasetKind::Train))?;
    log_loaded(DatasetKind::Train, training.series.len(), training.rows_used);

    let ideal = load_series_file(&config.path_for(DatasetKind::Ideal))?;
    log_loaded(DatasetKind::Ideal, ideal.series.len(), ideal.rows_used);

    let test = if with_test {
        let table = load_test_points(&config.path_for(DatasetKind::Test))?;
        log::info!(
            "Loaded {}: {} point(s)",
            DatasetKind::Test.display_name(),
            table.rows_used
        );
        Some(table)
    } else {
        None
    };

    Ok(Dataset {
        config: config.clone(),
        training,
        ideal,
        test,
    })
}

/// Names of the datasets under `data_dir` that contain all three CSV files.
pub fn discover_datasets(data_dir: &Path) -> Result<Vec<String>, AppError> {
    let entries = fs::read_dir(data_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to read data directory '{}': {e}", data_dir.display()),
        )
    })?;

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let complete = DatasetKind::ALL
            .iter()
            .all(|kind| path.join(kind.file_name()).is_file());
        if !complete {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn log_loaded(kind: DatasetKind, n_series: usize, n_rows: usize) {
    log::info!(
        "Loaded {}: {} series x {} point(s)",
        kind.display_name(),
        n_series,
        n_rows
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ideal-dataset-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_dataset(root: &Path, name: &str, with_test: bool) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("train.csv"), "x,y1\n1,2\n2,4\n").unwrap();
        fs::write(dir.join("ideal.csv"), "x,y1,y2\n1,2,0\n2,4,0\n").unwrap();
        if with_test {
            fs::write(dir.join("test.csv"), "x,y\n1,2.1\n").unwrap();
        }
    }

    #[test]
    fn discovers_only_complete_datasets() {
        let root = scratch("discover");
        write_dataset(&root, "B", true);
        write_dataset(&root, "A", true);
        write_dataset(&root, "partial", false);

        assert_eq!(discover_datasets(&root).unwrap(), ["A", "B"]);
    }

    #[test]
    fn loads_all_three_files() {
        let root = scratch("load");
        write_dataset(&root, "Dataset1", true);
        let config = DataConfig {
            data_dir: root,
            dataset: "Dataset1".to_string(),
        };

        let ds = load_dataset(&config, true).unwrap();
        assert_eq!(ds.training.series.len(), 1);
        assert_eq!(ds.ideal.series.len(), 2);
        assert_eq!(ds.test.map(|t| t.points.len()), Some(1));
    }

    #[test]
    fn missing_dataset_dir_is_reported() {
        let config = DataConfig {
            data_dir: scratch("missing"),
            dataset: "nope".to_string(),
        };
        assert_eq!(load_dataset(&config, false).unwrap_err().exit_code(), 2);
    }
}
