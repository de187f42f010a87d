//! Numeric helpers.

pub mod deviation;
pub mod ols;

pub use deviation::*;
pub use ols::*;
