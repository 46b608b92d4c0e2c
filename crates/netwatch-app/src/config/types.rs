//! Configuration types for netwatch
//!
//! Defines:
//! - `Settings` - Widget settings (`config.toml`)
//! - `FormatSettings` - Per-state output templates

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Widget settings (`config.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Interface to watch; the command line argument takes precedence
    #[serde(default)]
    pub interface: Option<String>,

    /// Seconds between probes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default)]
    pub format: FormatSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interface: None,
            refresh_interval_secs: default_refresh_interval_secs(),
            format: FormatSettings::default(),
        }
    }
}

impl Settings {
    /// Refresh interval, at least one second
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(MIN_REFRESH_INTERVAL_SECS))
    }
}

/// Lowest refresh interval accepted from a settings file
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 1;

fn default_refresh_interval_secs() -> u64 {
    5
}

/// Output templates, one per state.
///
/// Placeholders: `{iface}`, `{state}`, `{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatSettings {
    #[serde(default = "default_connected")]
    pub connected: String,

    #[serde(default = "default_waiting")]
    pub waiting: String,

    #[serde(default = "default_disconnected")]
    pub disconnected: String,

    #[serde(default = "default_unknown")]
    pub unknown: String,

    /// Mark output urgent whenever the interface reads as disconnected
    /// (which includes `unknown`)
    #[serde(default)]
    pub urgent_when_disconnected: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            connected: default_connected(),
            waiting: default_waiting(),
            disconnected: default_disconnected(),
            unknown: default_unknown(),
            urgent_when_disconnected: false,
        }
    }
}

fn default_connected() -> String {
    "{iface}: connected".to_string()
}

fn default_waiting() -> String {
    "{iface}: connecting".to_string()
}

fn default_disconnected() -> String {
    "{iface}: disconnected".to_string()
}

fn default_unknown() -> String {
    "{iface}: ?".to_string()
}
