//! Actuator contract and the `cmg-cli` implementation
//!
//! The rig's reaction wheel is driven by an external CLI:
//!
//! ```text
//! cmg-cli set --wheel <rate>,<angle>    start the wheel
//! cmg-cli set --idle                    return to the safe state
//! ```
//!
//! `idle` must be safe to call any number of times.

use std::fmt;
use std::process::{Command, Stdio};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{ActuatorError, ActuatorResult};

/// Default actuator utility
pub const DEFAULT_ACTUATOR_PROGRAM: &str = "cmg-cli";

/// Wheel rate (Hz) and gimbal angle (degrees), always supplied together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub rate: f64,
    pub angle: f64,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.rate, self.angle)
    }
}

/// The device under test
pub trait Actuator {
    /// Start the device
    fn activate(&mut self, activation: Activation) -> ActuatorResult<()>;

    /// Put the device into its safe idle state
    fn idle(&mut self) -> ActuatorResult<()>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn activate(&mut self, activation: Activation) -> ActuatorResult<()> {
        (**self).activate(activation)
    }

    fn idle(&mut self) -> ActuatorResult<()> {
        (**self).idle()
    }
}

/// Actuator driven through `cmg-cli set`
#[derive(Debug, Clone)]
pub struct CliActuator {
    program: String,
}

impl CliActuator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn set(&self, args: &[&str]) -> ActuatorResult<()> {
        let command = format!("{} set {}", self.program, args.join(" "));
        debug!("Running {}", command);
        let output = Command::new(&self.program)
            .arg("set")
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ActuatorError::Launch {
                command: command.clone(),
                source,
            })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ActuatorError::Rejected {
                command,
                status: output.status,
            })
        }
    }
}

impl Default for CliActuator {
    fn default() -> Self {
        Self::new(DEFAULT_ACTUATOR_PROGRAM)
    }
}

impl Actuator for CliActuator {
    fn activate(&mut self, activation: Activation) -> ActuatorResult<()> {
        info!(
            "Turning on the wheel at {} Hz, gimbal {} degrees",
            activation.rate, activation.angle
        );
        let wheel = activation.to_string();
        self.set(&["--wheel", wheel.as_str()])
    }

    fn idle(&mut self) -> ActuatorResult<()> {
        self.set(&["--idle"])
    }
}
