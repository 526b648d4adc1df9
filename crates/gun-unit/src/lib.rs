//! Fireline gun unit
//!
//! The field side of the synchronization protocol: one mortar crew's local
//! state. The unit keeps its operator-entered report fields, at most one
//! live fire order, and the acknowledgments it owes the FDC. The gun node's
//! tick loop asks it what to send and feeds it whatever comes back.

#![warn(missing_docs)]

pub mod unit;

pub use unit::{GunUnit, ReportFields};
