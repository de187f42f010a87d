//! Shared selection/mapping pipeline used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load dataset -> select (or load a saved selection) -> map test points -> summarize
//!
//! The command handlers can then focus on presentation (printing, plots, exports).

use crate::domain::{MappingResult, RunConfig, SelectionResult};
use crate::error::AppError;
use crate::io::dataset::{Dataset, load_dataset};
use crate::io::selection_file::read_selection_json;
use crate::math::LinearTrend;
use crate::report::{MappingSummary, selection_trends, summarize_mapping};

/// Outputs of a selection-only run.
#[derive(Debug, Clone)]
pub struct SelectOutput {
    pub dataset: Dataset,
    pub selection: SelectionResult,
    pub trends: Vec<Option<LinearTrend>>,
}

/// Outputs of a full select + map run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub selection: SelectionResult,
    pub trends: Vec<Option<LinearTrend>>,
    pub mapping: MappingResult,
    pub summary: MappingSummary,
}

/// Load training data and the pool, then select.
pub fn run_select(config: &RunConfig) -> Result<SelectOutput, AppError> {
    let dataset = load_dataset(&config.data, false)?;
    let selection = select_for(&dataset)?;
    let trends = selection_trends(&selection, &dataset.ideal.series);

    Ok(SelectOutput {
        dataset,
        selection,
        trends,
    })
}

/// Load the full dataset, select (or reuse `config.selection_path`), then map the test points.
pub fn run_map(config: &RunConfig) -> Result<RunOutput, AppError> {
    let dataset = load_dataset(&config.data, true)?;

    let selection = match &config.selection_path {
        Some(path) => {
            let file = read_selection_json(path)?;
            if file.dataset != config.data.dataset {
                log::warn!(
                    "Selection in {} was made for dataset '{}', mapping '{}'",
                    path.display(),
                    file.dataset,
                    config.data.dataset
                );
            }
            file.selection
        }
        None => select_for(&dataset)?,
    };

    let points = dataset
        .test
        .as_ref()
        .map(|t| t.points.as_slice())
        .ok_or_else(|| AppError::new(2, "Test data was not loaded."))?;

    let mapping = crate::fit::map(points, &selection, &dataset.ideal.series)?;
    let summary = summarize_mapping(&mapping, &selection);
    log::info!(
        "Mapped {} test point(s): {} assigned, {} unassigned",
        summary.total,
        summary.assigned,
        summary.unassigned
    );

    let trends = selection_trends(&selection, &dataset.ideal.series);

    Ok(RunOutput {
        dataset,
        selection,
        trends,
        mapping,
        summary,
    })
}

fn select_for(dataset: &Dataset) -> Result<SelectionResult, AppError> {
    let selection = crate::fit::select(&dataset.training.series, &dataset.ideal.series)?;
    for e in &selection.entries {
        log::info!(
            "{}: {} (Max Training Deviation: {})",
            e.training_id,
            e.candidate_id,
            e.max_training_deviation
        );
    }
    Ok(selection)
}
