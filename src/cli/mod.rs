//! Command-line parsing for the ideal function selector.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the selection/mapping code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DatasetKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ideal",
    version,
    about = "Ideal function selection and test point mapping"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select ideal functions, map the test points, print both reports (default).
    Run(RunArgs),
    /// Select ideal functions only.
    Select(SelectArgs),
    /// Map test points, reusing a saved selection when `--selection` is given.
    Map(RunArgs),
    /// Write a synthetic dataset.
    Generate(GenerateArgs),
    /// List datasets found under the data directory.
    Datasets(DataArgs),
    /// Print one CSV file of a dataset as a table.
    Show(ShowArgs),
}

/// Where to read the dataset from.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Directory holding one sub-directory per dataset [env: IDEAL_DATA_DIR] [default: data].
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Dataset name (sub-directory of the data dir) [env: DATASET_NAME] [default: Dataset1].
    #[arg(short = 'd', long)]
    pub dataset: Option<String>,
}

/// Terminal plot options.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Render an ASCII plot per selection in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `run` and `map`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Saved selection JSON (from `ideal select --export-selection`) to reuse.
    #[arg(long, value_name = "JSON")]
    pub selection: Option<PathBuf>,

    /// Export the selection to JSON.
    #[arg(long = "export-selection", value_name = "JSON")]
    pub export_selection: Option<PathBuf>,

    /// Export the per-point mapping to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Only write assigned test points to the CSV export.
    #[arg(long)]
    pub assigned_only: bool,

    /// Plot training data, test data and every ideal function before the reports.
    #[arg(long)]
    pub overview: bool,

    /// Number of mapping rows to print (all when omitted).
    #[arg(long)]
    pub rows: Option<usize>,

    /// Write a debug bundle (SSE matrix) into this directory.
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = "debug")]
    pub debug: Option<PathBuf>,
}

/// Options for `select`.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Export the selection to JSON.
    #[arg(long = "export-selection", value_name = "JSON")]
    pub export_selection: Option<PathBuf>,

    /// Write a debug bundle (SSE matrix) into this directory.
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = "debug")]
    pub debug: Option<PathBuf>,
}

/// Options for `show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Which file of the dataset to print.
    #[arg(short = 'k', long, value_enum, default_value_t = DatasetKind::Train)]
    pub kind: DatasetKind,

    /// Number of rows to print (all when omitted).
    #[arg(long)]
    pub rows: Option<usize>,
}

/// Options for `generate`.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output directory for train.csv, ideal.csv and test.csv.
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of ideal functions in the pool.
    #[arg(long, default_value_t = 50)]
    pub candidates: usize,

    /// Number of training series.
    #[arg(long, default_value_t = 4)]
    pub training: usize,

    /// Number of test points.
    #[arg(long, default_value_t = 100)]
    pub test: usize,

    /// Number of x grid points.
    #[arg(long, default_value_t = 400)]
    pub grid_points: usize,

    /// Std dev of the Gaussian noise.
    #[arg(long, default_value_t = 0.3)]
    pub noise: f64,

    /// Share of test points drawn as outliers.
    #[arg(long, default_value_t = 0.2)]
    pub outlier_share: f64,
}
