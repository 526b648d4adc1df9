//! Structured logging initialization for fireline nodes.
//!
//! Both node binaries call into this module once at startup; library crates
//! only emit through the `tracing` macros.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize human-readable logging.
///
/// The level is taken from `RUST_LOG`, defaulting to `info`.
///
/// # Example
/// ```no_run
/// fireline_core::logging::init();
/// tracing::info!("FDC listening");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true))
        .init();
}

/// Initialize JSON logging for log-aggregated deployments.
pub fn init_json() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_target(true))
        .init();
}
