//! Synthetic dataset generation.
//!
//! Produces a dataset in the on-disk layout read by `io::dataset`:
//!
//! - a pool of ideal functions drawn from a small family of shapes, sampled on
//!   a uniform x grid
//! - training series: randomly chosen ideal functions plus Gaussian noise
//! - test points on the same grid, mostly near a training source, with a
//!   share of outliers that should stay unassigned
//!
//! Generation is deterministic for a given config (seeded `StdRng`).

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DatasetKind, Point, Series};
use crate::error::AppError;

/// Knobs for [`generate_dataset`].
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub n_candidates: usize,
    pub n_training: usize,
    pub n_test: usize,
    pub grid_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Std dev of the Gaussian noise on training and test values.
    pub noise: f64,
    /// Share of test points drawn uniformly over the y range (likely unassigned).
    pub outlier_share: f64,
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            n_candidates: 50,
            n_training: 4,
            n_test: 100,
            grid_points: 400,
            x_min: -20.0,
            x_max: 19.9,
            noise: 0.3,
            outlier_share: 0.2,
            seed: 42,
        }
    }
}

/// A generated dataset, plus which candidate each training series came from.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub training: Vec<Series>,
    pub ideal: Vec<Series>,
    pub test: Vec<Point>,
    /// Pool index behind each training series.
    pub sources: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Quadratic { a: f64, b: f64, c: f64 },
    Sine { amp: f64, freq: f64, phase: f64 },
    Exp { amp: f64, rate: f64 },
    Log { amp: f64, offset: f64 },
    Tanh { amp: f64, scale: f64 },
}

impl Shape {
    fn random(rng: &mut StdRng, k: usize) -> Self {
        match k % 5 {
            0 => Shape::Quadratic {
                a: rng.gen_range(-5.0..5.0),
                b: rng.gen_range(-2.0..2.0),
                c: rng.gen_range(-0.2..0.2),
            },
            1 => Shape::Sine {
                amp: rng.gen_range(0.5..10.0),
                freq: rng.gen_range(0.1..1.5),
                phase: rng.gen_range(0.0..std::f64::consts::TAU),
            },
            2 => Shape::Exp {
                amp: rng.gen_range(-5.0..5.0),
                rate: rng.gen_range(-0.15..0.15),
            },
            3 => Shape::Log {
                amp: rng.gen_range(-8.0..8.0),
                offset: rng.gen_range(-5.0..5.0),
            },
            _ => Shape::Tanh {
                amp: rng.gen_range(-10.0..10.0),
                scale: rng.gen_range(0.05..1.0),
            },
        }
    }

    fn eval(self, x: f64) -> f64 {
        match self {
            Shape::Quadratic { a, b, c } => a + b * x + c * x * x,
            Shape::Sine { amp, freq, phase } => amp * (freq * x + phase).sin(),
            Shape::Exp { amp, rate } => amp * (rate * x).exp(),
            Shape::Log { amp, offset } => amp * (x.abs() + 1.0).ln() + offset,
            Shape::Tanh { amp, scale } => amp * (scale * x).tanh(),
        }
    }
}

/// Generate a dataset from `config`.
pub fn generate_dataset(config: &GenerateConfig) -> Result<SyntheticDataset, AppError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(generation_seed(config));
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let grid = uniform_grid(config.x_min, config.x_max, config.grid_points);

    let ideal: Vec<Series> = (0..config.n_candidates)
        .map(|k| {
            let shape = Shape::random(&mut rng, k);
            let points = grid.iter().map(|&x| Point::new(x, shape.eval(x))).collect();
            Series::new(format!("y{}", k + 1), points)
        })
        .collect();

    let sources = rand::seq::index::sample(&mut rng, config.n_candidates, config.n_training).into_vec();

    let training: Vec<Series> = sources
        .iter()
        .enumerate()
        .map(|(i, &src)| {
            let points = ideal[src]
                .points
                .iter()
                .map(|p| Point::new(p.x, p.y + normal.sample(&mut rng)))
                .collect();
            Series::new(format!("y{}", i + 1), points)
        })
        .collect();

    let (y_lo, y_hi) = ideal
        .iter()
        .flat_map(|s| s.ys())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

    let mut test = Vec::with_capacity(config.n_test);
    for _ in 0..config.n_test {
        let i = rng.gen_range(0..grid.len());
        let x = grid[i];
        let y = if rng.gen_bool(config.outlier_share) && y_hi > y_lo {
            rng.gen_range(y_lo..y_hi)
        } else {
            let src = sources[rng.gen_range(0..sources.len())];
            ideal[src].points[i].y + normal.sample(&mut rng)
        };
        test.push(Point::new(x, y));
    }

    Ok(SyntheticDataset {
        training,
        ideal,
        test,
        sources,
    })
}

/// Write a generated dataset as `train.csv`, `ideal.csv` and `test.csv` into `dir`.
pub fn write_dataset(dir: &Path, data: &SyntheticDataset) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", dir.display())))?;

    write_series_csv(&dir.join(DatasetKind::Train.file_name()), &data.training)?;
    write_series_csv(&dir.join(DatasetKind::Ideal.file_name()), &data.ideal)?;

    let test_path = dir.join(DatasetKind::Test.file_name());
    let mut writer = csv_writer(&test_path)?;
    write_row(&mut writer, &test_path, ["x".to_string(), "y".to_string()])?;
    for p in &data.test {
        write_row(&mut writer, &test_path, [p.x.to_string(), p.y.to_string()])?;
    }
    flush(&mut writer, &test_path)?;

    log::info!(
        "Synthetic dataset written to {} ({} training, {} ideal, {} test)",
        dir.display(),
        data.training.len(),
        data.ideal.len(),
        data.test.len()
    );
    Ok(())
}

fn validate(config: &GenerateConfig) -> Result<(), AppError> {
    if config.n_candidates == 0 || config.n_training == 0 {
        return Err(AppError::new(2, "Candidate and training counts must be > 0."));
    }
    if config.n_training > config.n_candidates {
        return Err(AppError::new(
            2,
            format!(
                "Training count ({}) cannot exceed candidate count ({}).",
                config.n_training, config.n_candidates
            ),
        ));
    }
    if config.grid_points < 2 {
        return Err(AppError::new(2, "Grid needs at least 2 points."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(AppError::new(2, "Invalid x range for generation."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be finite and >= 0."));
    }
    if !(0.0..=1.0).contains(&config.outlier_share) {
        return Err(AppError::new(2, "Outlier share must be within [0, 1]."));
    }
    Ok(())
}

fn uniform_grid(min: f64, max: f64, n: usize) -> Vec<f64> {
    let step = (max - min) / (n as f64 - 1.0);
    // Rounded so the CSV values stay short; rounding is monotone, so the grid stays sorted.
    (0..n)
        .map(|i| ((min + step * i as f64) * 1e6).round() / 1e6)
        .collect()
}

fn generation_seed(config: &GenerateConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.seed.hash(&mut hasher);
    config.n_candidates.hash(&mut hasher);
    config.n_training.hash(&mut hasher);
    config.n_test.hash(&mut hasher);
    config.grid_points.hash(&mut hasher);
    config.x_min.to_bits().hash(&mut hasher);
    config.x_max.to_bits().hash(&mut hasher);
    config.noise.to_bits().hash(&mut hasher);
    config.outlier_share.to_bits().hash(&mut hasher);
    hasher.finish()
}

fn write_series_csv(path: &Path, series: &[Series]) -> Result<(), AppError> {
    let mut writer = csv_writer(path)?;

    let mut header = vec!["x".to_string()];
    header.extend(series.iter().map(|s| s.id.clone()));
    write_row(&mut writer, path, header)?;

    let n = series.first().map(Series::len).unwrap_or(0);
    for i in 0..n {
        let mut row = vec![series[0].points[i].x.to_string()];
        row.extend(series.iter().map(|s| s.points[i].y.to_string()));
        write_row(&mut writer, path, row)?;
    }

    flush(&mut writer, path)
}

fn csv_writer(path: &Path) -> Result<csv::Writer<fs::File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_row<I>(writer: &mut csv::Writer<fs::File>, path: &Path, row: I) -> Result<(), AppError>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    writer
        .write_record(row)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

fn flush(writer: &mut csv::Writer<fs::File>, path: &Path) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush '{}': {e}", path.display())))
}
