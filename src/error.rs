//! Error types.
//!
//! Two layers:
//!
//! - [`FitError`]: structured failures of the selection/mapping core. These always
//!   indicate malformed input, never a "point doesn't fit" outcome.
//! - [`AppError`]: what the binary reports. Carries the process exit code.

use thiserror::Error;

/// Failures raised by [`crate::fit::select`] and [`crate::fit::map`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// A series does not share the reference x-axis.
    #[error("series '{series}' is not aligned with the shared x-axis: {reason}")]
    Alignment { series: String, reason: String },

    /// Nothing to operate on.
    #[error("empty input: {what}")]
    EmptyInput { what: &'static str },

    /// Two series in one collection share an id.
    #[error("duplicate {collection} series id '{id}'")]
    DuplicateId { collection: &'static str, id: String },

    /// The selection references a candidate that is not in the pool.
    #[error("selection references unknown candidate '{candidate}'")]
    UnknownCandidate { candidate: String },

    /// A test point's x is not on the candidate grid.
    #[error("test point #{index} (x={x}, y={y}) is outside the domain of candidate '{candidate}'")]
    OutOfDomain {
        index: usize,
        x: f64,
        y: f64,
        candidate: String,
    },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err {
            FitError::EmptyInput { .. } => 3,
            FitError::Alignment { .. }
            | FitError::DuplicateId { .. }
            | FitError::UnknownCandidate { .. }
            | FitError::OutOfDomain { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
