//! Fireline FDC
//!
//! The Fire Direction Center's view of the world: a registry of reporting
//! guns, a table of active missions, and the queues of fire orders and
//! end-of-mission notices awaiting delivery. A single `MissionCoordinator`
//! value owns all of it; the node loop calls in once per tick and from
//! protocol dispatch, so no locking is ever involved.

#![warn(missing_docs)]

pub mod coordinator;
pub mod error;
pub mod gun;
pub mod mission;
pub mod order;

pub use coordinator::{Directive, MissionCoordinator};
pub use error::FdcError;
pub use gun::{Gun, GunRegistry, GunStatus};
pub use mission::{GunMissionStatus, Mission, MissionRequest, MissionStatus};
pub use order::{EndOfMissionNotice, FireOrder};
