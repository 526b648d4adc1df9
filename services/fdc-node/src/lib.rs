//! Fireline FDC node
//!
//! Hosts the mission coordinator behind the synchronization protocol: one
//! cooperative loop that accepts gun connections, dispatches their traffic,
//! and runs the per-tick maintenance passes. Operator intents and display
//! snapshots cross the loop boundary only through channels.

#![warn(missing_docs)]

pub mod node;

pub use node::{FdcHandle, FdcNode, FdcSnapshot, OperatorIntent};
