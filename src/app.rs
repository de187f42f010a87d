//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the dataset location (flags, `.env`, environment, defaults)
//! - runs selection and mapping
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, DataArgs, GenerateArgs, PlotArgs, RunArgs, SelectArgs, ShowArgs};
use crate::domain::{DataConfig, DatasetKind, MappingResult, RunConfig, SelectionResult, Series};
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DATASET: &str = "Dataset1";

/// Entry point for the `ideal` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args, OutputMode::Full),
        Command::Map(args) => handle_run(args, OutputMode::MappingOnly),
        Command::Select(args) => handle_select(args),
        Command::Generate(args) => handle_generate(args),
        Command::Datasets(args) => handle_datasets(args),
        Command::Show(args) => handle_show(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    MappingOnly,
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_map(&config)?;

    if args.overview {
        let test = run.dataset.test.as_ref().map(|t| t.points.as_slice()).unwrap_or_default();
        println!(
            "{}",
            crate::plot::render_overview_plot(
                &run.dataset.training.series,
                &run.dataset.ideal.series,
                test,
                config.plot_width,
                config.plot_height,
            )
        );
    }

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_selection_summary(
                &config.data.dataset,
                &run.dataset.training.stats,
                run.dataset.ideal.series.len(),
                &run.selection,
                &run.trends,
            )
        );
    }

    println!("{}", crate::report::format_mapping_table(&run.mapping, args.rows));
    println!("{}", crate::report::format_mapping_summary(&run.summary));

    if config.plot {
        print_plots(&config, &run.dataset.training.series, &run.dataset.ideal.series, &run.selection, Some(&run.mapping));
    }

    if let Some(path) = &config.export_selection {
        crate::io::selection_file::write_selection_json(path, &run.selection, &config.data.dataset)?;
    }
    if let Some(path) = &config.export_mapping {
        crate::io::export::write_mapping_csv(path, &run.mapping, config.assigned_only)?;
    }
    if let Some(dir) = &config.debug_dir {
        let path = crate::debug::write_debug_bundle(
            dir,
            &config.data.dataset,
            &run.dataset.training.series,
            &run.dataset.ideal.series,
            &run.selection,
        )?;
        println!("Debug bundle: {}", path.display());
    }

    Ok(())
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let config = select_config_from_args(&args);
    let out = pipeline::run_select(&config)?;

    println!(
        "{}",
        crate::report::format_selection_summary(
            &config.data.dataset,
            &out.dataset.training.stats,
            out.dataset.ideal.series.len(),
            &out.selection,
            &out.trends,
        )
    );

    if config.plot {
        print_plots(&config, &out.dataset.training.series, &out.dataset.ideal.series, &out.selection, None);
    }

    if let Some(path) = &config.export_selection {
        crate::io::selection_file::write_selection_json(path, &out.selection, &config.data.dataset)?;
    }
    if let Some(dir) = &config.debug_dir {
        let path = crate::debug::write_debug_bundle(
            dir,
            &config.data.dataset,
            &out.dataset.training.series,
            &out.dataset.ideal.series,
            &out.selection,
        )?;
        println!("Debug bundle: {}", path.display());
    }

    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = crate::data::GenerateConfig {
        n_candidates: args.candidates,
        n_training: args.training,
        n_test: args.test,
        grid_points: args.grid_points,
        noise: args.noise,
        outlier_share: args.outlier_share,
        seed: args.seed,
        ..Default::default()
    };
    let data = crate::data::generate_dataset(&config)?;
    crate::data::write_dataset(&args.out, &data)?;

    println!("Wrote synthetic dataset to {}", args.out.display());
    for (t, &src) in data.training.iter().zip(&data.sources) {
        println!("- {} generated from {}", t.id, data.ideal[src].id);
    }
    Ok(())
}

fn handle_datasets(args: DataArgs) -> Result<(), AppError> {
    let data = resolve_data_config(&args, env_var);
    let names = crate::io::dataset::discover_datasets(&data.data_dir)?;
    if names.is_empty() {
        println!("No datasets found under {}", data.data_dir.display());
        return Ok(());
    }
    println!("Datasets under {}:", data.data_dir.display());
    for name in names {
        let marker = if name == data.dataset { " (selected)" } else { "" };
        println!("- {name}{marker}");
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let data = resolve_data_config(&args.data, env_var);
    let path = data.path_for(args.kind);

    let series = match args.kind {
        DatasetKind::Train | DatasetKind::Ideal => crate::io::ingest::load_series_file(&path)?.series,
        DatasetKind::Test => vec![Series::new("y", crate::io::ingest::load_test_points(&path)?.points)],
    };

    println!("{} ({}, {})", args.kind.display_name(), data.dataset, path.display());
    println!("{}", crate::report::format_series_table(&series, args.rows));
    Ok(())
}

fn print_plots(
    config: &RunConfig,
    training: &[Series],
    pool: &[Series],
    selection: &SelectionResult,
    mapping: Option<&MappingResult>,
) {
    for e in &selection.entries {
        let (Some(t), Some(c)) = (
            training.iter().find(|s| s.id == e.training_id),
            e.candidate_in(pool),
        ) else {
            log::warn!("Skipping plot for {}: series not found", e.training_id);
            continue;
        };
        let mapped: Vec<_> = mapping
            .map(|m| {
                m.assigned()
                    .filter(|(_, a)| a.training_id == e.training_id)
                    .map(|(p, _)| *p)
                    .collect()
            })
            .unwrap_or_default();
        println!(
            "{}",
            crate::plot::render_selection_plot(t, c, &mapped, config.plot_width, config.plot_height)
        );
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the dataset location: flag, then environment, then default.
pub fn resolve_data_config(args: &DataArgs, env: impl Fn(&str) -> Option<String>) -> DataConfig {
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| env("IDEAL_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let dataset = args
        .dataset
        .clone()
        .or_else(|| env("DATASET_NAME"))
        .unwrap_or_else(|| DEFAULT_DATASET.to_string());
    DataConfig { data_dir, dataset }
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        data: resolve_data_config(&args.data, env_var),
        plot: plot_enabled(&args.plot),
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        selection_path: args.selection.clone(),
        export_selection: args.export_selection.clone(),
        export_mapping: args.export.clone(),
        assigned_only: args.assigned_only,
        debug_dir: args.debug.clone(),
    }
}

pub fn select_config_from_args(args: &SelectArgs) -> RunConfig {
    RunConfig {
        data: resolve_data_config(&args.data, env_var),
        plot: plot_enabled(&args.plot),
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        selection_path: None,
        export_selection: args.export_selection.clone(),
        export_mapping: None,
        assigned_only: false,
        debug_dir: args.debug.clone(),
    }
}

fn plot_enabled(args: &PlotArgs) -> bool {
    args.plot && !args.no_plot
}

/// Rewrite argv so `ideal` defaults to `ideal run`.
///
/// Rules:
/// - `ideal`                       -> `ideal run`
/// - `ideal -d Dataset2 ...`       -> `ideal run -d Dataset2 ...`
/// - `ideal --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "run" | "select" | "map" | "generate" | "datasets"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_run() {
        assert_eq!(rewrite_args(args(&["ideal"])), args(&["ideal", "run"]));
        assert_eq!(
            rewrite_args(args(&["ideal", "-d", "Dataset2"])),
            args(&["ideal", "run", "-d", "Dataset2"])
        );
        assert_eq!(rewrite_args(args(&["ideal", "--help"])), args(&["ideal", "--help"]));
        assert_eq!(
            rewrite_args(args(&["ideal", "select", "--no-plot"])),
            args(&["ideal", "select", "--no-plot"])
        );
    }

    #[test]
    fn data_config_prefers_flag_then_env_then_default() {
        let env = |key: &str| match key {
            "DATASET_NAME" => Some("FromEnv".to_string()),
            _ => None,
        };

        let from_env = resolve_data_config(&DataArgs::default(), env);
        assert_eq!(from_env.dataset, "FromEnv");
        assert_eq!(from_env.data_dir, PathBuf::from("data"));

        let flagged = DataArgs {
            data_dir: Some(PathBuf::from("/tmp/sets")),
            dataset: Some("Dataset3".to_string()),
        };
        let from_flag = resolve_data_config(&flagged, env);
        assert_eq!(from_flag.dataset, "Dataset3");
        assert_eq!(from_flag.data_dir, PathBuf::from("/tmp/sets"));

        let defaults = resolve_data_config(&DataArgs::default(), |_| None);
        assert_eq!(defaults.dataset, "Dataset1");
    }
}
