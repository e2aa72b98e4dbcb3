//! Core engine for thermofuse
//!
//! Reads thermocouple boards, parses a rig's structured output into rows
//! and decides when a thermal run has to stop.
//!
//! Main pieces:
//! - [`ThermalReader`]: one reading per configured source, NaN on failure
//! - [`parser`]: structured line to flat [`Row`]
//! - [`ThresholdGuard`]: absolute safety limit
//! - [`SteadyStateDetector`]: sliding-window variance check
//! - [`RowLogger`]: append-only CSV persistence
//!
//! ```
//! use thermofuse_core::{parser, SteadyConfig, SteadyStateDetector, ThresholdGuard};
//!
//! let guard = ThresholdGuard::new(70.0, ["THERMO_X_TEMP"]);
//! let mut steady = SteadyStateDetector::new(SteadyConfig::new(10.0, 0.5, 5.0), ["THERMO_X_TEMP"]);
//!
//! let line = r#"{"TIMESTAMP":"2025-06-10T12:00:00","THERMOCOUPLE":{"X":{"TEMP":35.2}}}"#;
//! let row = parser::parse_line(line).unwrap();
//! assert!(guard.passes(&row));
//! assert!(!steady.update(&row));
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod guard;
pub mod interrupt;
pub mod logger;
pub mod parser;
pub mod process;
pub mod reader;
pub mod reading;
pub mod steady;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use config::{SourceConfig, TcType};
pub use errors::{
    ConfigError, ConfigResult, HardwareError, HardwareResult, LogError, LogResult, ParseError,
    ParseResult,
};
pub use guard::{Breach, ThresholdGuard};
pub use interrupt::Interrupt;
pub use logger::{read_log, RowLogger};
pub use process::SharedChild;
pub use reader::ThermalReader;
pub use reading::{Readings, Row, TIME_KEY};
pub use steady::{SteadyConfig, SteadyStateDetector};
pub use time::{FixedTime, MonotonicTime, Seconds, TimeSource};
pub use traits::{Board, BoardDriver, BoardInfo, ReadingKind, ThermalSource};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
