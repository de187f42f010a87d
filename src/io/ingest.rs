//! CSV ingest and normalization.
//!
//! Two file shapes are supported:
//!
//! - **series files** (`train.csv`, `ideal.csv`): `x,<id1>,<id2>,...` where every
//!   non-`x` column is one series over the shared x column
//! - **point files** (`test.csv`): `x,y`, one test point per row
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows and columns keep file order)
//! - **Separation of concerns**: no selection logic here

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Point, Series, TestPoint};
use crate::error::AppError;

/// Summary stats about the values actually loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// A series file after ingest.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    pub series: Vec<Series>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// A point file after ingest.
#[derive(Debug, Clone)]
pub struct TestTable {
    pub points: Vec<TestPoint>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a series file: one [`Series`] per non-`x` column, sharing the `x` column.
///
/// A row with any missing or non-finite value is skipped as a whole, so all
/// series keep the same grid.
pub fn load_series_file(path: &Path) -> Result<SeriesTable, AppError> {
    let (mut reader, headers) = open_csv(path)?;
    let header_map = build_header_map(&headers);
    let x_idx = require_column(&header_map, "x", path)?;

    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|&(idx, _)| idx != x_idx)
        .map(|(idx, name)| (idx, clean_header_name(name).to_string()))
        .filter(|(_, name)| !name.is_empty())
        .collect();
    if columns.is_empty() {
        return Err(AppError::new(
            2,
            format!("'{}' has no series columns besides `x`.", path.display()),
        ));
    }
    if let Some(dup) = first_duplicate(columns.iter().map(|(_, name)| name.as_str())) {
        return Err(AppError::new(
            2,
            format!("Duplicate series column `{dup}` in '{}'.", path.display()),
        ));
    }

    let mut xs = Vec::new();
    let mut ys: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_series_row(&record, x_idx, &columns) {
            Ok((x, row)) => {
                xs.push(x);
                for (col, y) in ys.iter_mut().zip(row) {
                    col.push(y);
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = xs.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            format!("No valid rows in '{}'.", path.display()),
        ));
    }

    let series: Vec<Series> = columns
        .into_iter()
        .zip(ys)
        .map(|((_, id), col)| {
            let points = xs.iter().zip(col).map(|(&x, y)| Point::new(x, y)).collect();
            Series::new(id, points)
        })
        .collect();

    let stats = compute_stats(series.iter().flat_map(|s| s.points.iter().copied()))
        .ok_or_else(|| AppError::new(3, format!("No finite values in '{}'.", path.display())))?;

    log_row_errors(path, &row_errors);

    Ok(SeriesTable {
        series,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Load a point file with `x` and `y` columns.
pub fn load_test_points(path: &Path) -> Result<TestTable, AppError> {
    let (mut reader, headers) = open_csv(path)?;
    let header_map = build_header_map(&headers);
    let x_idx = require_column(&header_map, "x", path)?;
    let y_idx = require_column(&header_map, "y", path)?;

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_cell(&record, x_idx, "x")
            .and_then(|x| parse_cell(&record, y_idx, "y").map(|y| Point::new(x, y)));
        match parsed {
            Ok(p) => points.push(p),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = points.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            format!("No valid rows in '{}'.", path.display()),
        ));
    }

    let stats = compute_stats(points.iter().copied())
        .ok_or_else(|| AppError::new(3, format!("No finite values in '{}'.", path.display())))?;

    log_row_errors(path, &row_errors);

    Ok(TestTable {
        points,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn open_csv(path: &Path) -> Result<(csv::Reader<File>, StringRecord), AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .clone();

    Ok((reader, headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(clean_header_name(name).to_ascii_lowercase()).or_insert(idx);
    }
    map
}

fn clean_header_name(name: &str) -> &str {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the `x` column goes missing.
    name.trim().trim_start_matches('\u{feff}').trim()
}

fn first_duplicate<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.find(|name| !seen.insert(*name))
}

fn require_column(header_map: &HashMap<String, usize>, name: &str, path: &Path) -> Result<usize, AppError> {
    header_map.get(name).copied().ok_or_else(|| {
        AppError::new(
            2,
            format!("Missing required column `{name}` in '{}'.", path.display()),
        )
    })
}

fn parse_series_row(
    record: &StringRecord,
    x_idx: usize,
    columns: &[(usize, String)],
) -> Result<(f64, Vec<f64>), String> {
    let x = parse_cell(record, x_idx, "x")?;
    let ys = columns
        .iter()
        .map(|(idx, name)| parse_cell(record, *idx, name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((x, ys))
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value for `{name}`."))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{raw}' for `{name}`."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value for `{name}`."))
    }
}

fn compute_stats(points: impl Iterator<Item = Point>) -> Option<DatasetStats> {
    let mut n_points = 0usize;
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for p in points {
        n_points += 1;
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }

    Some(DatasetStats {
        n_points,
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

fn log_row_errors(path: &Path, row_errors: &[RowError]) {
    if row_errors.is_empty() {
        return;
    }
    log::warn!("{}: skipped {} row(s)", path.display(), row_errors.len());
    for e in row_errors {
        log::debug!("{}:{}: {}", path.display(), e.line, e.message);
    }
}
