//! Control Loop Defaults
//!
//! Values used when a monitor configuration leaves a field out. The key
//! lists match the row names produced by the stream parser for the
//! power board and the four thermocouple positions of the rig.

/// Temperature at or above which a monitored key stops the run (°C).
pub const DEFAULT_THRESHOLD_C: f64 = 70.0;

/// Maximum run duration (seconds).
pub const DEFAULT_TIME_LIMIT_S: f64 = 3600.0;

/// Keys checked against the safety threshold.
pub const DEFAULT_THRESHOLD_KEYS: [&str; 6] = [
    "POWER_TMP2",
    "POWER_TMP3",
    "THERMO_X_TEMP",
    "THERMO_Z_TEMP",
    "THERMO_SP_TEMP",
    "THERMO_NSP_TEMP",
];

/// Keys that must all settle before the run counts as steady.
pub const DEFAULT_STEADY_KEYS: [&str; 4] = [
    "THERMO_X_TEMP",
    "THERMO_Z_TEMP",
    "THERMO_SP_TEMP",
    "THERMO_NSP_TEMP",
];

/// Process exit code after an interrupt (128 + SIGINT).
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Unit appended to injected readings in text mode.
pub const THERMAL_UNIT: &str = "degC";

/// Pause between idle attempts while the actuator refuses (milliseconds).
pub const DEFAULT_IDLE_RETRY_MS: u64 = 1000;
