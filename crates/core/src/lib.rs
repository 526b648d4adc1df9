//! Fireline core
//!
//! Shared infrastructure for the fireline nodes:
//! - TOML configuration for the FDC and gun-unit binaries
//! - Structured logging initialization

#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub use config::{FdcConfig, GunConfig, TimingConfig};
