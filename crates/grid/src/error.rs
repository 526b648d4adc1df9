//! Grid engine error types

use thiserror::Error;

/// Validation failures raised by the grid engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The token does not match the grid grammar.
    #[error("invalid grid format: \"{0}\"")]
    InvalidGrid(String),

    /// Bearing outside [0, 360].
    #[error("invalid azimuth given: {0}")]
    InvalidAzimuth(f64),

    /// Malformed deviation or range correction token.
    #[error("invalid correction format: \"{0}\"")]
    InvalidCorrection(String),
}
