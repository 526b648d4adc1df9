//! Configuration management for fireline nodes.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the FDC node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdcConfig {
    /// Unit identifier reported in logs.
    pub unit_id: String,
    /// Solve from cell centers instead of northwest corners.
    pub centered_grids: bool,
    /// Listener settings.
    pub network: FdcNetworkConfig,
    /// Loop timing.
    pub timing: TimingConfig,
}

/// Listener settings for the FDC node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdcNetworkConfig {
    /// Interface to bind the accepting socket on.
    pub host: String,
    /// Listen port. The toolkit's conventional port is 844.
    pub port: u16,
    /// Service every pending connection in a tick instead of at most one.
    /// The one-per-tick default pushes backpressure onto the gun timers.
    pub drain_accepts: bool,
}

/// Configuration for a gun-unit node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GunConfig {
    /// Unit identifier, used as the gun's registry key at the FDC.
    pub unit_id: String,
    /// Where to reach the FDC.
    pub fdc: FdcEndpointConfig,
    /// Loop timing.
    pub timing: TimingConfig,
}

/// Where a gun unit reaches its FDC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdcEndpointConfig {
    /// FDC host name or address.
    pub host: String,
    /// FDC listen port.
    pub port: u16,
}

/// Loop timing shared by both node roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Tick period in milliseconds.
    pub tick_ms: u64,
    /// Socket read deadline in milliseconds.
    pub read_timeout_ms: u64,
}

impl FdcConfig {
    /// Load the FDC configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Built-in defaults for running without a config file.
    pub fn default_config() -> Self {
        Self {
            unit_id: "fdc-1".to_string(),
            centered_grids: false,
            network: FdcNetworkConfig {
                host: "0.0.0.0".to_string(),
                port: 844,
                drain_accepts: false,
            },
            timing: TimingConfig {
                tick_ms: 1000,
                read_timeout_ms: 2000,
            },
        }
    }
}

impl GunConfig {
    /// Load a gun-unit configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Built-in defaults for running without a config file.
    pub fn default_config() -> Self {
        Self {
            unit_id: "gun-1".to_string(),
            fdc: FdcEndpointConfig {
                host: "127.0.0.1".to_string(),
                port: 844,
            },
            // The gun tick is deliberately longer than the FDC's accept
            // processing so retries cannot pile up connections.
            timing: TimingConfig {
                tick_ms: 3000,
                read_timeout_ms: 4000,
            },
        }
    }
}
