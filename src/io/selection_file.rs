//! Read/write selection JSON files.
//!
//! A selection file is the "portable" result of `ideal select`:
//! - which candidate each training series matched
//! - the SSE and max training deviation behind each choice
//! - run metadata (dataset name, timestamp, admission factor)
//!
//! The schema is defined by `domain::SelectionFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{ADMISSION_FACTOR, SelectionFile, SelectionResult};
use crate::error::AppError;

/// Write a selection JSON file.
pub fn write_selection_json(path: &Path, selection: &SelectionResult, dataset: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create selection JSON '{}': {e}", path.display())))?;

    let doc = SelectionFile {
        tool: "ideal".to_string(),
        dataset: dataset.to_string(),
        generated_at: Utc::now(),
        admission_factor: ADMISSION_FACTOR,
        selection: selection.clone(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write selection JSON: {e}")))?;

    log::info!("Selection written to {}", path.display());
    Ok(())
}

/// Read a selection JSON file.
pub fn read_selection_json(path: &Path) -> Result<SelectionFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open selection JSON '{}': {e}", path.display())))?;
    let doc: SelectionFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid selection JSON: {e}")))?;

    if doc.admission_factor != ADMISSION_FACTOR {
        log::warn!(
            "{} was written with admission factor {}; mapping uses {}",
            path.display(),
            doc.admission_factor,
            ADMISSION_FACTOR
        );
    }
    Ok(doc)
}
