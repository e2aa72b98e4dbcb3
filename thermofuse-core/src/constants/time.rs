//! Timestamp Decomposition Factors
//!
//! Row timestamps are reduced to a single seconds value with a fixed
//! calendar approximation. The result orders samples within one run and
//! measures short spans; it is not an epoch time and must not be compared
//! across runs or across month boundaries.

/// Days counted per year.
pub const DAYS_PER_YEAR_APPROX: f64 = 365.0;

/// Days counted per month, regardless of the actual month.
pub const DAYS_PER_MONTH_APPROX: f64 = 30.0;

/// Hours per day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = HOURS_PER_DAY * MINUTES_PER_HOUR * SECONDS_PER_MINUTE;
