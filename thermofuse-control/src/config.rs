//! Monitor configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Command-line flags are applied on top of a loaded file before
//! [`MonitorConfig::validate`] runs.
//!
//! ```json
//! {
//!   "threshold": 70.0,
//!   "time_limit_secs": 3600,
//!   "defer_secs": 120,
//!   "steady": { "window_secs": 300, "threshold": 0.2, "interval_secs": 30 },
//!   "speed": 50.0,
//!   "gimbal": 45.0
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thermofuse_core::config::{load_json, require_pair, require_positive};
use thermofuse_core::constants::monitor::{
    DEFAULT_IDLE_RETRY_MS, DEFAULT_STEADY_KEYS, DEFAULT_THRESHOLD_KEYS,
};
use thermofuse_core::constants::{DEFAULT_THRESHOLD_C, DEFAULT_TIME_LIMIT_S};
use thermofuse_core::{ConfigError, ConfigResult, SteadyConfig};

use crate::actuator::Activation;

/// Data source: the interceptor in structured mode at 1 Hz
pub const DEFAULT_SOURCE_COMMAND: [&str; 8] = [
    "thermo-fuse",
    "fuse",
    "-C",
    "thermo_config.json",
    "--",
    "--power",
    "-s",
    "1",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Safety limit in °C
    pub threshold: f64,
    /// Keys checked against `threshold`
    pub threshold_keys: Vec<String>,
    /// Maximum run duration
    pub time_limit_secs: f64,
    /// Delay before activation and steady-state checks
    pub defer_secs: Option<f64>,
    /// Steady-state window, threshold and interval
    pub steady: SteadyConfig,
    /// Keys that must all settle
    pub steady_keys: Vec<String>,
    /// Wheel rate in Hz; requires `gimbal`
    pub speed: Option<f64>,
    /// Gimbal angle in degrees; requires `speed`
    pub gimbal: Option<f64>,
    /// Data source argument vector
    pub command: Vec<String>,
    /// Append to an existing log instead of truncating it
    pub append: bool,
    /// Pause between failed idle attempts
    pub idle_retry_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_C,
            threshold_keys: DEFAULT_THRESHOLD_KEYS.iter().map(|k| k.to_string()).collect(),
            time_limit_secs: DEFAULT_TIME_LIMIT_S,
            defer_secs: None,
            steady: SteadyConfig::default(),
            steady_keys: DEFAULT_STEADY_KEYS.iter().map(|k| k.to_string()).collect(),
            speed: None,
            gimbal: None,
            command: DEFAULT_SOURCE_COMMAND.iter().map(|s| s.to_string()).collect(),
            append: false,
            idle_retry_ms: DEFAULT_IDLE_RETRY_MS,
        }
    }
}

impl MonitorConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Ok(serde_json::from_value(load_json(path)?)?)
    }

    /// Check every field before anything is started
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::NotFinite { field: "threshold" });
        }
        require_positive(Some(self.time_limit_secs), "time_limit_secs")?;
        require_positive(self.defer_secs, "defer_secs")?;
        self.steady.validate()?;
        self.activation()?;
        if self.command.is_empty() {
            return Err(ConfigError::EmptyCommand { field: "command" });
        }
        Ok(())
    }

    /// Wheel activation, if both halves were given
    pub fn activation(&self) -> ConfigResult<Option<Activation>> {
        let pair = require_pair(self.speed, self.gimbal, ("speed", "gimbal"))?;
        Ok(pair.map(|(rate, angle)| Activation { rate, angle }))
    }
}
