//! Hardware Limits for Thermocouple DAQ Boards
//!
//! Boards stack on one bus and are selected by address jumpers; each board
//! carries four thermocouple inputs.

/// Highest board address selectable by jumpers.
pub const MAX_ADDRESS: u8 = 7;

/// Highest channel index on one board (four inputs, 0-3).
pub const MAX_CHANNEL: u8 = 3;

/// Number of channels per board.
pub const CHANNELS_PER_BOARD: usize = MAX_CHANNEL as usize + 1;

// ===== FAULT SENTINELS =====
//
// The board reports thermocouple faults in-band as fixed temperatures.
// A reading equal to one of these is a failed read, not a temperature.

/// Open thermocouple detected (°C sentinel).
pub const OPEN_TC_VALUE: f64 = -9999.0;

/// Input voltage outside the junction type's range (°C sentinel).
pub const OVERRANGE_TC_VALUE: f64 = -8888.0;

/// Common-mode voltage out of range (°C sentinel).
pub const COMMON_MODE_TC_VALUE: f64 = -7777.0;

/// Map a raw temperature to its fault name, if it is a sentinel.
pub fn fault_name(value: f64) -> Option<&'static str> {
    if value == OPEN_TC_VALUE {
        Some("open thermocouple")
    } else if value == OVERRANGE_TC_VALUE {
        Some("over-range input")
    } else if value == COMMON_MODE_TC_VALUE {
        Some("common-mode error")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_faults() {
        assert_eq!(fault_name(-9999.0), Some("open thermocouple"));
        assert_eq!(fault_name(-8888.0), Some("over-range input"));
        assert_eq!(fault_name(-7777.0), Some("common-mode error"));
        assert_eq!(fault_name(25.0), None);
    }
}
