//! Selection and mapping.
//!
//! Responsibilities:
//!
//! - check that all series share one x-axis (`axis`)
//! - pick the least-squares best candidate per training series (`selection`)
//! - assign test points to the chosen candidates (`mapping`)

pub mod axis;
pub mod mapping;
pub mod selection;

pub use mapping::map;
pub use selection::{score_matrix, select};
