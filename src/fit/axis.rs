//! Shared x-axis checks and exact grid lookup.
//!
//! Candidate functions are only defined on their discrete grid. Lookups are
//! exact (no interpolation), keyed by the bit pattern of `x` with `-0.0`
//! folded onto `0.0` so the key agrees with `==`.

use std::collections::HashMap;

use crate::domain::Series;
use crate::error::FitError;

/// Ensure every series in `groups` has exactly the x-values of `reference`.
pub fn ensure_aligned<'a>(
    reference: &Series,
    groups: impl IntoIterator<Item = &'a Series>,
) -> Result<(), FitError> {
    for series in groups {
        if series.len() != reference.len() {
            return Err(FitError::Alignment {
                series: series.id.clone(),
                reason: format!(
                    "has {} points, expected {} (as in '{}')",
                    series.len(),
                    reference.len(),
                    reference.id
                ),
            });
        }
        if let Some((i, (x, x_ref))) = series
            .xs()
            .zip(reference.xs())
            .enumerate()
            .find(|(_, (x, x_ref))| x != x_ref)
        {
            return Err(FitError::Alignment {
                series: series.id.clone(),
                reason: format!("x[{i}]={x} differs from {x_ref} in '{}'", reference.id),
            });
        }
    }
    Ok(())
}

/// Exact `x -> y` lookup over a series grid.
#[derive(Debug, Clone)]
pub struct GridLookup<'a> {
    series: &'a Series,
    index: HashMap<u64, usize>,
}

impl<'a> GridLookup<'a> {
    pub fn new(series: &'a Series) -> Self {
        let mut index = HashMap::with_capacity(series.len());
        for (i, x) in series.xs().enumerate() {
            // First occurrence wins if a grid repeats an x.
            index.entry(grid_key(x)).or_insert(i);
        }
        Self { series, index }
    }

    /// `C(x)` if `x` is on the grid.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        self.index.get(&grid_key(x)).map(|&i| self.series.points[i].y)
    }
}

fn grid_key(x: f64) -> u64 {
    (x + 0.0).to_bits()
}
