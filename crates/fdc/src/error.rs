//! FDC error types

use fireline_ballistics::BallisticsError;
use fireline_grid::GridError;
use thiserror::Error;

/// Failures raised by coordinator operations.
///
/// Every variant aborts only the operation that raised it; shared state is
/// never left half-mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FdcError {
    /// No mission with the given id.
    #[error("no such mission: \"{0}\"")]
    UnknownMission(String),

    /// A mission with the given id already exists.
    #[error("mission id already in use: \"{0}\"")]
    DuplicateMission(String),

    /// Grid engine validation failure.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Ballistic calculator failure.
    #[error(transparent)]
    Ballistics(#[from] BallisticsError),
}
