//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the series/point model shared by training data, ideal functions and test data
//! - selection and mapping outputs (`SelectionResult`, `MappingResult`)
//! - run configuration (`DataConfig`, `RunConfig`)

pub mod types;

pub use types::*;
