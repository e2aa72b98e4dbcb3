//! Interceptor configuration
//!
//! ```json
//! {
//!   "sources": [
//!     { "key": "BATTERY_TEMP", "address": 0, "channel": 0, "tc_type": "K" }
//!   ],
//!   "command": ["stdbuf", "-oL", "-eL", "cmg-cli", "get"]
//! }
//! ```
//!
//! `command` is optional. The arguments given after `--` on the command
//! line are appended to it.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};
use thermofuse_core::config::load_json;
use thermofuse_core::{ConfigError, ConfigResult, SourceConfig, TcType};

/// Child command prefix: line-buffered `cmg-cli get`
pub const DEFAULT_COMMAND: [&str; 5] = ["stdbuf", "-oL", "-eL", "cmg-cli", "get"];

/// Key used by single-source mode when none is given
pub const SINGLE_SOURCE_KEY: &str = "TEMP_FUSED";

/// Validated interceptor configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuseConfig {
    pub sources: Vec<SourceConfig>,
    pub command: Vec<String>,
}

impl FuseConfig {
    /// Validate a decoded config document
    pub fn from_value(raw: &Value) -> ConfigResult<Self> {
        let sources = SourceConfig::parse_list(raw.get("sources").unwrap_or(&Value::Null))?;
        let command = match raw.get("command") {
            None | Some(Value::Null) => default_command(),
            Some(value) => {
                let command: Vec<String> = serde_json::from_value(value.clone())?;
                if command.is_empty() {
                    return Err(ConfigError::EmptyCommand { field: "command" });
                }
                command
            }
        };
        Ok(Self { sources, command })
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_value(&load_json(path)?)
    }

    /// One source given directly on the command line
    pub fn single(address: u8, channel: u8, tc_type: TcType, key: Option<&str>) -> ConfigResult<Self> {
        let raw = json!({
            "sources": [{
                "address": address,
                "channel": channel,
                "tc_type": tc_type.as_str(),
                "key": key.unwrap_or(SINGLE_SOURCE_KEY),
            }]
        });
        Self::from_value(&raw)
    }

    /// The example three-source configuration
    pub fn example() -> Self {
        Self {
            sources: SourceConfig::example_set(),
            command: default_command(),
        }
    }

    /// Write the example configuration to `path`
    pub fn write_example(path: &Path) -> ConfigResult<()> {
        let text = serde_json::to_string_pretty(&Self::example())?;
        std::fs::write(path, text + "\n").map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full child argument vector: configured command plus `args`
    pub fn child_command(&self, args: &[String]) -> Vec<String> {
        self.command.iter().chain(args).cloned().collect()
    }
}

fn default_command() -> Vec<String> {
    DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect()
}
