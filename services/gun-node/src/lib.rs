//! Fireline gun node
//!
//! The field side of the toolchain: a gun unit's state machine driven by a
//! slow report loop. Each tick opens one short-lived connection to the FDC,
//! sends exactly one message, and applies whatever comes back. Failures are
//! absorbed and simply retried on the next tick.

#![warn(missing_docs)]

pub mod node;

pub use node::{GunHandle, GunNode, UnitIntent, UnitSnapshot};
