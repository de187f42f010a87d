//! Pointwise deviation metrics between two aligned series.
//!
//! Both functions assume the caller already checked that the series share the
//! same x-grid; they pair values by index.

use crate::domain::Series;

/// `Σ (a.y_i - b.y_i)^2`.
pub fn sum_squared_deviation(a: &Series, b: &Series) -> f64 {
    a.ys().zip(b.ys()).map(|(ya, yb)| (ya - yb) * (ya - yb)).sum()
}

/// `max_i |a.y_i - b.y_i|` (0 for empty series).
pub fn max_abs_deviation(a: &Series, b: &Series) -> f64 {
    a.ys()
        .zip(b.ys())
        .map(|(ya, yb)| (ya - yb).abs())
        .fold(0.0, f64::max)
}
