//! Least squares helpers.
//!
//! Reports describe each selected ideal function by its straight-line trend
//! `y ≈ intercept + slope * x`. That is a tiny ordinary least squares problem:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2,   x_i = [1, x_i]
//! ```
//!
//! Implementation choices:
//! - SVD solve, so tall design matrices work (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Progressively looser tolerances for near-singular grids.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::Series;

/// Straight-line summary of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
    /// Coefficient of determination (1 for a flat series fitted exactly).
    pub r_squared: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = intercept + slope * x` to a series.
///
/// Returns `None` for fewer than two points or a degenerate system.
pub fn linear_trend(series: &Series) -> Option<LinearTrend> {
    let n = series.len();
    if n < 2 {
        return None;
    }

    let mut design = DMatrix::<f64>::zeros(n, 2);
    for (i, x) in series.xs().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x;
    }
    let y = DVector::from_iterator(n, series.ys());

    let beta = solve_least_squares(&design, &y)?;
    let fitted = &design * &beta;

    let mean = y.mean();
    let ss_res: f64 = y.iter().zip(fitted.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
    let ss_tot: f64 = y.iter().map(|v| (v - mean) * (v - mean)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(LinearTrend {
        intercept: beta[0],
        slope: beta[1],
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn linear_trend_recovers_line() {
        let s = Series::from_pairs("y1", &[(-1.0, -1.5), (0.0, 0.5), (1.0, 2.5), (2.0, 4.5)]);
        let trend = linear_trend(&s).unwrap();
        assert!((trend.intercept - 0.5).abs() < 1e-9);
        assert!((trend.slope - 2.0).abs() < 1e-9);
        assert!((trend.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn linear_trend_needs_two_points() {
        let s = Series::from_pairs("y1", &[(1.0, 1.0)]);
        assert!(linear_trend(&s).is_none());
    }
}
