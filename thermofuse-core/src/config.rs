//! Thermal source configuration
//!
//! A run is described by a list of sources, each naming one physical
//! thermocouple input (board address + channel), its junction type and the
//! key under which its reading is injected. The list is fixed for the
//! lifetime of a run.
//!
//! Validation happens here, before any board is opened. The raw JSON is
//! walked by hand rather than derived so that every rejection can name the
//! source index and the field at fault:
//!
//! ```text
//! Source 1 'channel' must be an integer 0-3
//! Source 2 missing required 'tc_type' field
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{MAX_ADDRESS, MAX_CHANNEL};
use crate::errors::{ConfigError, ConfigResult};

/// Thermocouple junction type
///
/// Discriminants match the board's numeric type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TcType {
    J = 0,
    K = 1,
    T = 2,
    E = 3,
    R = 4,
    S = 5,
    B = 6,
    N = 7,
}

impl TcType {
    /// Every junction type, in board code order
    pub const ALL: [TcType; 8] = [
        TcType::J,
        TcType::K,
        TcType::T,
        TcType::E,
        TcType::R,
        TcType::S,
        TcType::B,
        TcType::N,
    ];

    /// Numeric code written to the board
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Single-letter name
    pub fn as_str(self) -> &'static str {
        match self {
            TcType::J => "J",
            TcType::K => "K",
            TcType::T => "T",
            TcType::E => "E",
            TcType::R => "R",
            TcType::S => "S",
            TcType::B => "B",
            TcType::N => "N",
        }
    }
}

impl Default for TcType {
    fn default() -> Self {
        TcType::K
    }
}

impl fmt::Display for TcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        TcType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| s.to_string())
    }
}

/// One configured thermocouple input
///
/// Only produced through [`SourceConfig::parse_list`] or
/// [`SourceConfig::new`], so every instance is in range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceConfig {
    /// Board address (0-7, set by jumpers)
    pub address: u8,
    /// Channel on the board (0-3)
    pub channel: u8,
    /// Junction type written to the channel before every read
    pub tc_type: TcType,
    /// Key the reading is injected under
    pub key: String,
}

impl SourceConfig {
    /// Build a source, defaulting the key to `TEMP_<address>_<channel>`
    pub fn new(address: u8, channel: u8, tc_type: TcType, key: Option<&str>) -> Self {
        let key = key
            .map(str::to_string)
            .unwrap_or_else(|| default_key(address, channel));
        Self {
            address,
            channel,
            tc_type,
            key,
        }
    }

    /// Validate a raw `sources` list
    pub fn parse_list(raw: &Value) -> ConfigResult<Vec<SourceConfig>> {
        let entries = match raw.as_array() {
            Some(entries) if !entries.is_empty() => entries,
            _ => return Err(ConfigError::NoSources),
        };

        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let source = Self::parse_one(index, entry)?;
            if !seen.insert(source.key.clone()) {
                return Err(ConfigError::DuplicateKey {
                    index,
                    key: source.key,
                });
            }
            sources.push(source);
        }

        Ok(sources)
    }

    fn parse_one(index: usize, entry: &Value) -> ConfigResult<SourceConfig> {
        let obj = entry
            .as_object()
            .ok_or(ConfigError::NotAnObject { index })?;

        let address = ranged_field(index, obj.get("address"), "address", MAX_ADDRESS)?;
        let channel = ranged_field(index, obj.get("channel"), "channel", MAX_CHANNEL)?;

        let tc_raw = obj.get("tc_type").ok_or(ConfigError::MissingField {
            index,
            field: "tc_type",
        })?;
        let tc_type = tc_raw
            .as_str()
            .and_then(|s| s.parse::<TcType>().ok())
            .ok_or_else(|| ConfigError::UnknownTcType {
                index,
                value: tc_raw.to_string().trim_matches('"').to_string(),
            })?;

        let key = match obj.get("key") {
            None | Some(Value::Null) => None,
            Some(Value::String(k)) if !k.trim().is_empty() => Some(k.trim()),
            Some(_) => {
                return Err(ConfigError::InvalidField {
                    index,
                    field: "key",
                })
            }
        };

        Ok(SourceConfig::new(address, channel, tc_type, key))
    }

    /// The three-source layout written by `init-config`
    pub fn example_set() -> Vec<SourceConfig> {
        vec![
            SourceConfig::new(0, 0, TcType::K, Some("BATTERY_TEMP")),
            SourceConfig::new(0, 1, TcType::K, Some("MOTOR_TEMP")),
            SourceConfig::new(1, 0, TcType::K, Some("AMBIENT_TEMP")),
        ]
    }
}

/// Key used when a source does not name one
pub fn default_key(address: u8, channel: u8) -> String {
    format!("TEMP_{}_{}", address, channel)
}

/// Read a JSON config file into an untyped tree for validation
pub fn load_json(path: &Path) -> ConfigResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Reject a pair where only one side is present
pub fn require_pair<T>(
    first: Option<T>,
    second: Option<T>,
    names: (&'static str, &'static str),
) -> ConfigResult<Option<(T, T)>> {
    match (first, second) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        _ => Err(ConfigError::IncompletePair {
            first: names.0,
            second: names.1,
        }),
    }
}

/// Reject non-positive or non-finite values
pub fn require_positive(value: Option<f64>, field: &'static str) -> ConfigResult<Option<f64>> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(ConfigError::NotPositive { field }),
        other => Ok(other),
    }
}

fn ranged_field(
    index: usize,
    value: Option<&Value>,
    field: &'static str,
    max: u8,
) -> ConfigResult<u8> {
    let value = value.ok_or(ConfigError::MissingField { index, field })?;
    value
        .as_u64()
        .filter(|v| *v <= max as u64)
        .map(|v| v as u8)
        .ok_or(ConfigError::OutOfRange {
            index,
            field,
            min: 0,
            max,
        })
}
