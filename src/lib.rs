//! `ideal-functions` library crate.
//!
//! The binary (`ideal`) is a thin wrapper around this library so that:
//!
//! - selection and mapping are testable without spawning processes
//! - the core (`fit`) can be reused with data from any source

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
