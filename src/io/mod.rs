//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - dataset directory layout + discovery (`dataset`)
//! - mapping exports (CSV) (`export`)
//! - selection JSON read/write (`selection_file`)

pub mod dataset;
pub mod export;
pub mod ingest;
pub mod selection_file;

pub use dataset::*;
pub use export::*;
pub use ingest::*;
pub use selection_file::*;
