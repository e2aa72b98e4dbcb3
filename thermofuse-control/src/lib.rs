//! Stop/go control loop for thermal test runs
//!
//! Reads rows from a data source, logs every one to CSV, and stops the run
//! on the first of:
//!
//! | Condition            | Reason                          |
//! |----------------------|---------------------------------|
//! | monitored key >= limit | [`StopReason::ThresholdExceeded`] |
//! | elapsed > time limit | [`StopReason::TimeLimit`]         |
//! | all keys settled     | [`StopReason::SteadyState`]       |
//! | source closed        | [`StopReason::StreamEnded`]       |
//! | SIGINT / SIGTERM     | [`StopReason::Interrupted`]       |
//!
//! Whatever ends the run, including an error or a panic, the actuator is
//! sent to idle before the controller goes away.
//!
//! ## Example
//!
//! ```no_run
//! use thermofuse_control::{ChildRows, CliActuator, Controller, MonitorConfig};
//! use thermofuse_core::{Interrupt, MonotonicTime, RowLogger};
//!
//! let config = MonitorConfig::default();
//! let interrupt = Interrupt::new();
//! let logger = RowLogger::create("run.csv")?;
//! let mut controller = Controller::new(&config, CliActuator::default(), MonotonicTime::new(), logger)?
//!     .with_interrupt(interrupt.clone());
//! let rows = ChildRows::spawn(&config.command, &interrupt)?;
//! let reason = controller.run(rows)?;
//! println!("{}", reason);
//! # Ok::<(), thermofuse_control::ControlError>(())
//! ```

pub mod actuator;
pub mod config;
pub mod controller;
pub mod errors;
pub mod shutdown;
pub mod source;

pub use actuator::{Activation, Actuator, CliActuator};
pub use config::MonitorConfig;
pub use controller::{Controller, Phase, StopReason};
pub use errors::{ActuatorError, ActuatorResult, ControlError, ControlResult};
pub use shutdown::TerminationGuard;
pub use source::ChildRows;
