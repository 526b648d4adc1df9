//! Ballistic calculator error types

use fireline_grid::GridError;
use thiserror::Error;

/// Failures raised while computing firing data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BallisticsError {
    /// Computed range lies outside the calibrated band.
    #[error("out of range for mortar: {0}m")]
    OutOfRange(u32),

    /// Shell label not present in the burst table.
    #[error("unknown shell type: \"{0}\"")]
    UnknownShell(String),

    /// Sheaf label outside the supported pattern set.
    #[error("unknown sheaf pattern: \"{0}\"")]
    UnknownSheaf(String),

    /// Grid engine rejected an input token.
    #[error(transparent)]
    Grid(#[from] GridError),
}
