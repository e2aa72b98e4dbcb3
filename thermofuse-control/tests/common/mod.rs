//! Shared fixtures for thermofuse-control integration tests
//!
//! - `RecordingActuator`: records every command, can refuse idles
//! - `frame` / `source_script`: rig output lines and a child that prints them

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use thermofuse_control::{Activation, ActuatorError, ActuatorResult, Actuator, MonitorConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Activate(Activation),
    Idle,
}

/// Actuator fake; clones share the command log
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    log: Rc<RefCell<Vec<Command>>>,
    refuse_idles: Rc<RefCell<usize>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` idle commands
    pub fn refusing(self, n: usize) -> Self {
        *self.refuse_idles.borrow_mut() = n;
        self
    }

    pub fn commands(&self) -> Vec<Command> {
        self.log.borrow().clone()
    }

    pub fn idles(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|c| **c == Command::Idle)
            .count()
    }

    pub fn activations(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|c| matches!(c, Command::Activate(_)))
            .count()
    }
}

impl Actuator for RecordingActuator {
    fn activate(&mut self, activation: Activation) -> ActuatorResult<()> {
        self.log.borrow_mut().push(Command::Activate(activation));
        Ok(())
    }

    fn idle(&mut self) -> ActuatorResult<()> {
        self.log.borrow_mut().push(Command::Idle);
        let mut refuse = self.refuse_idles.borrow_mut();
        if *refuse > 0 {
            *refuse -= 1;
            return Err(ActuatorError::Unavailable("controller busy".into()));
        }
        Ok(())
    }
}

/// Config watching `THERMO_X_TEMP` and `POWER_TMP2` with no idle back-off
pub fn test_config() -> MonitorConfig {
    MonitorConfig {
        threshold_keys: vec!["POWER_TMP2".into(), "THERMO_X_TEMP".into()],
        steady_keys: vec!["THERMO_X_TEMP".into()],
        idle_retry_ms: 0,
        ..MonitorConfig::default()
    }
}

/// One structured output line `second` seconds into 2025-06-10 12:00
pub fn frame(second: u32, x_temp: f64, tmp2: f64) -> String {
    format!(
        r#"{{"TIMESTAMP":"2025-06-10T12:{:02}:{:02}.000000","POWER":{{"VIN":24.0,"TMP2":{}}},"THERMOCOUPLE":{{"X":{{"TEMP":{}}}}}}}"#,
        second / 60,
        second % 60,
        tmp2,
        x_temp
    )
}

/// `sh -c` command that prints `lines` and then runs `tail`
pub fn source_script(lines: &[String], tail: &str) -> Vec<String> {
    let mut script: Vec<String> = lines.iter().map(|l| format!("echo '{}'", l)).collect();
    if !tail.is_empty() {
        script.push(tail.to_string());
    }
    vec!["sh".into(), "-c".into(), script.join("; ")]
}
