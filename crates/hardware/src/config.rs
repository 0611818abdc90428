//! Configuration system for the reorder buffer core.
//!
//! This module defines the configuration structures used to parameterize the core. It provides:
//! 1. **Defaults:** Baseline hardware sizes (slot count, write-back ports).
//! 2. **Structures:** Hierarchical config for general settings and the reorder buffer itself.
//! 3. **Validation:** Configuration-time checks that reject impossible geometries.
//!
//! Configuration is supplied as JSON (CLI `--config`, scenario files, or a Python dict from
//! the bindings) or built with `Config::default()`.

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants for the core.
mod defaults {
    /// Number of reorder buffer slots. Must be a power of two.
    pub const ROB_ENTRIES: usize = 16;

    /// Number of write-back (completion) ports sampled each cycle.
    pub const WRITEBACK_PORTS: usize = 4;
}

/// Root configuration structure.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use rvrob_core::config::Config;
///
/// let config = Config::default();
/// assert!(!config.general.trace_cycles);
/// assert_eq!(config.rob.entries, 16);
/// assert_eq!(config.rob.writeback_ports, 4);
/// ```
///
/// Deserializing from JSON, with omitted fields falling back to defaults:
///
/// ```
/// use rvrob_core::config::Config;
///
/// let json = r#"{ "rob": { "entries": 64 } }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.rob.entries, 64);
/// assert_eq!(config.rob.writeback_ports, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Reorder buffer geometry.
    #[serde(default)]
    pub rob: RobConfig,
}

impl Config {
    /// Checks every section for configuration-time fatal conditions.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        self.rob.validate()
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Emit a `tracing` event with the full port state every cycle.
    #[serde(default)]
    pub trace_cycles: bool,
}

/// Reorder buffer geometry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RobConfig {
    /// Number of slots (N). Must be a power of two and at least 2; at most N-1 are ever occupied.
    #[serde(default = "RobConfig::default_entries")]
    pub entries: usize,

    /// Number of write-back ports (W) merged each cycle.
    #[serde(default = "RobConfig::default_writeback_ports")]
    pub writeback_ports: usize,
}

impl RobConfig {
    fn default_entries() -> usize {
        defaults::ROB_ENTRIES
    }

    fn default_writeback_ports() -> usize {
        defaults::WRITEBACK_PORTS
    }

    /// Rejects slot counts that break modulo wraparound and port counts that cannot complete work.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TooSmall`], [`ConfigError::NotPowerOfTwo`] or
    /// [`ConfigError::NoWritebackPorts`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.entries < 2 {
            return Err(ConfigError::TooSmall(self.entries));
        }
        if !self.entries.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(self.entries));
        }
        if self.writeback_ports == 0 {
            return Err(ConfigError::NoWritebackPorts);
        }
        Ok(())
    }
}

impl Default for RobConfig {
    fn default() -> Self {
        Self {
            entries: defaults::ROB_ENTRIES,
            writeback_ports: defaults::WRITEBACK_PORTS,
        }
    }
}
