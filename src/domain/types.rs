//! Shared domain types.
//!
//! These types are intentionally kept flat and serializable so they can be:
//!
//! - used in-memory during selection and mapping
//! - exported to JSON/CSV
//! - reloaded later (a saved selection feeds `ideal map --selection`)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Multiplier applied to a selection's max training deviation to get the
/// admission threshold for test points.
pub const ADMISSION_FACTOR: f64 = std::f64::consts::SQRT_2;

/// A single `(x, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An unseen point to classify. Its x need not be on the training grid.
pub type TestPoint = Point;

/// A named, ordered series of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(id: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            id: id.into(),
            points,
        }
    }

    /// Build a series from `(x, y)` tuples.
    pub fn from_pairs(id: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Self::new(id, pairs.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// Best-fit candidate for one training series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub training_id: String,
    pub candidate_id: String,
    /// Position of the candidate in the pool (tie-break order).
    pub candidate_index: usize,
    pub sum_squared_deviation: f64,
    /// Largest `|T.y - C.y|` over the shared grid.
    pub max_training_deviation: f64,
}

impl SelectionEntry {
    /// Largest deviation a test point may have and still be assigned.
    pub fn admission_threshold(&self) -> f64 {
        self.max_training_deviation * ADMISSION_FACTOR
    }

    /// Position of the chosen candidate in `pool`.
    ///
    /// The recorded index wins while it still points at a series with the
    /// recorded id; otherwise (e.g. a saved selection against a reordered pool)
    /// the id is searched.
    pub fn pool_index(&self, pool: &[Series]) -> Option<usize> {
        match pool.get(self.candidate_index) {
            Some(c) if c.id == self.candidate_id => Some(self.candidate_index),
            _ => pool.iter().position(|c| c.id == self.candidate_id),
        }
    }

    /// The chosen candidate series in `pool`.
    pub fn candidate_in<'a>(&self, pool: &'a [Series]) -> Option<&'a Series> {
        self.pool_index(pool).map(|i| &pool[i])
    }
}

/// Selector output: one entry per training series, in training order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionResult {
    pub entries: Vec<SelectionEntry>,
}

impl SelectionResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a test point landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub candidate_id: String,
    /// Training series whose selection admitted the point.
    pub training_id: String,
    /// `|y - C(x)|`.
    pub deviation: f64,
}

/// Classification of a single test point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub point: TestPoint,
    pub assignment: Option<Assignment>,
}

impl Mapping {
    pub fn assigned(&self) -> bool {
        self.assignment.is_some()
    }
}

/// Mapper output: one entry per test point, in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingResult {
    pub mappings: Vec<Mapping>,
}

impl MappingResult {
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn assigned_count(&self) -> usize {
        self.mappings.iter().filter(|m| m.assigned()).count()
    }

    pub fn assigned(&self) -> impl Iterator<Item = (&TestPoint, &Assignment)> {
        self.mappings
            .iter()
            .filter_map(|m| m.assignment.as_ref().map(|a| (&m.point, a)))
    }
}

/// Which CSV file of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Train,
    Ideal,
    Test,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [DatasetKind::Train, DatasetKind::Ideal, DatasetKind::Test];

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::Train => "train.csv",
            DatasetKind::Ideal => "ideal.csv",
            DatasetKind::Test => "test.csv",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            DatasetKind::Train => "Training Data",
            DatasetKind::Ideal => "Ideal Functions",
            DatasetKind::Test => "Test Data",
        }
    }
}

/// Where to find a dataset on disk.
///
/// Resolved once by the app layer and passed into the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub dataset: String,
}

impl DataConfig {
    pub fn dataset_dir(&self) -> PathBuf {
        self.data_dir.join(&self.dataset)
    }

    pub fn path_for(&self, kind: DatasetKind) -> PathBuf {
        self.dataset_dir().join(kind.file_name())
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and environment).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data: DataConfig,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Reuse a saved selection instead of selecting again.
    pub selection_path: Option<PathBuf>,
    pub export_selection: Option<PathBuf>,
    pub export_mapping: Option<PathBuf>,
    /// Only write assigned test points to the mapping export.
    pub assigned_only: bool,

    /// Directory for the debug bundle (if requested).
    pub debug_dir: Option<PathBuf>,
}

/// A saved selection file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionFile {
    pub tool: String,
    pub dataset: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub admission_factor: f64,
    pub selection: SelectionResult,
}
