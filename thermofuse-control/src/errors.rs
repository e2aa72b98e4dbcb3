//! Error types for the control loop
//!
//! Stop conditions (threshold, time limit, steady state, end of stream,
//! interrupt) are reported through [`crate::StopReason`], never here.

use std::process::ExitStatus;

use thermofuse_core::{ConfigError, LogError, ParseError};
use thiserror::Error;

/// Result type for actuator commands
pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// Result type for the control loop
pub type ControlResult<T> = Result<T, ControlError>;

/// An actuator command did not succeed
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("Failed to run '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    Rejected { command: String, status: ExitStatus },

    #[error("Actuator unavailable: {0}")]
    Unavailable(String),
}

/// Failure that ends a run on the error path
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Row log error: {0}")]
    Log(#[from] LogError),

    #[error("Bad stream line: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Data source exited with {status} before producing any data")]
    SourceFailed { status: ExitStatus },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
