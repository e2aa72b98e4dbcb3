//! Error Types for Thermal Monitoring
//!
//! ## Error Categories
//!
//! Errors fall into four groups, one enum each:
//!
//! ### Configuration
//! - `ConfigError`: rejected before any hardware is touched. Every variant
//!   names the offending source index or field so the operator can fix the
//!   file without guessing.
//!
//! ### Hardware
//! - `HardwareError`: a board could not be opened, configured or read.
//!   The Thermal Source Reader never propagates these; it turns them into
//!   NaN for the affected key only.
//!
//! ### Stream data
//! - `ParseError`: a structured line could not be turned into a row.
//!
//! ### Persistence
//! - `LogError`: the append-only row log could not be written or re-read.
//!
//! Stop conditions (threshold exceeded, steady state reached, time limit)
//! are *not* errors and never appear here.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use thermofuse_core::{ConfigError, SourceConfig};
//!
//! let raw = serde_json::json!([{ "address": 9, "channel": 0, "tc_type": "K" }]);
//! match SourceConfig::parse_list(&raw) {
//!     Ok(_) => {}
//!     Err(ConfigError::OutOfRange { index, field, .. }) => {
//!         assert_eq!((index, field), (0, "address"));
//!     }
//!     Err(other) => panic!("unexpected: {other}"),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for board operations
pub type HardwareResult<T> = Result<T, HardwareError>;

/// Result type for stream parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for the row log
pub type LogResult<T> = Result<T, LogError>;

/// Configuration rejected before hardware access
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or has the wrong shape
    #[error("Invalid config: {0}")]
    Syntax(#[from] serde_json::Error),

    /// `sources` is missing, empty, or not a list
    #[error("'sources' must be a non-empty list")]
    NoSources,

    /// A source entry is not an object
    #[error("Source {index} must be an object")]
    NotAnObject { index: usize },

    /// A required field is absent
    #[error("Source {index} missing required '{field}' field")]
    MissingField { index: usize, field: &'static str },

    /// A field is present but has the wrong type or an empty value
    #[error("Source {index} '{field}' must be a non-empty string")]
    InvalidField { index: usize, field: &'static str },

    /// A numeric field is outside its hardware range
    #[error("Source {index} '{field}' must be an integer {min}-{max}")]
    OutOfRange {
        index: usize,
        field: &'static str,
        min: u8,
        max: u8,
    },

    /// Thermocouple code is not one of the eight junction types
    #[error("Source {index} 'tc_type' must be one of: K, J, T, E, R, S, B, N (got '{value}')")]
    UnknownTcType { index: usize, value: String },

    /// Two sources resolve to the same injected key
    #[error("Source {index} key '{key}' is already used by another source")]
    DuplicateKey { index: usize, key: String },

    /// Only one half of a parameter pair was supplied
    #[error("Both '{first}' and '{second}' must be provided together")]
    IncompletePair {
        first: &'static str,
        second: &'static str,
    },

    /// A parameter that must be positive is not
    #[error("'{field}' must be a positive number")]
    NotPositive { field: &'static str },

    /// A limit is NaN or infinite
    #[error("'{field}' must be a finite number")]
    NotFinite { field: &'static str },

    /// The child argument vector is empty
    #[error("'{field}' must name a program to run")]
    EmptyCommand { field: &'static str },
}

/// Board access failure, always scoped to one address or channel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HardwareError {
    /// No board answers at this address
    #[error("No board at address {address}")]
    NotFound { address: u8 },

    /// Opening the board handle failed
    #[error("Failed to open board {address}: {reason}")]
    Open { address: u8, reason: String },

    /// Reading a channel failed
    #[error("Read failed on board {address} channel {channel}: {reason}")]
    Read {
        address: u8,
        channel: u8,
        reason: String,
    },

    /// Writing the thermocouple type failed
    #[error("Configure failed on board {address} channel {channel}: {reason}")]
    Configure {
        address: u8,
        channel: u8,
        reason: String,
    },

    /// Board reported one of its fault sentinel values
    #[error("Board {address} channel {channel} reported {fault}")]
    Fault {
        address: u8,
        channel: u8,
        fault: &'static str,
    },
}

/// Structured line could not be turned into a row
#[derive(Error, Debug)]
pub enum ParseError {
    /// Line is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Line is JSON but not an object
    #[error("Expected a JSON object")]
    NotAnObject,

    /// The timestamp field is absent or not a string
    #[error("Missing '{0}' field")]
    MissingField(&'static str),

    /// Timestamp does not follow `YYYY-MM-DDTHH:MM:SS[.ffffff]`
    #[error("Malformed timestamp '{0}'")]
    Timestamp(String),
}

/// Row log failure
#[derive(Error, Debug)]
pub enum LogError {
    /// Underlying file operation failed
    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),

    /// Re-read log has a malformed line
    #[error("Log line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
