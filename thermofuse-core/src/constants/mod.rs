//! Constants for thermofuse
//!
//! Numeric limits and defaults used across the workspace, grouped by
//! domain:
//! - **Hardware**: board addressing and fault sentinel values
//! - **Time**: timestamp decomposition factors
//! - **Monitor**: default stop conditions and monitored keys
//!
//! Use these instead of magic numbers; names carry their units.

/// Board addressing and fault sentinels for the thermocouple DAQ boards.
pub mod hardware;

/// Timestamp decomposition factors.
pub mod time;

/// Defaults for the stop/go control loop.
pub mod monitor;

pub use hardware::{
    MAX_ADDRESS, MAX_CHANNEL, OPEN_TC_VALUE, OVERRANGE_TC_VALUE, COMMON_MODE_TC_VALUE,
};

pub use time::{DAYS_PER_YEAR_APPROX, DAYS_PER_MONTH_APPROX, SECONDS_PER_DAY};

pub use monitor::{
    DEFAULT_THRESHOLD_C, DEFAULT_TIME_LIMIT_S, INTERRUPT_EXIT_CODE, THERMAL_UNIT,
};
