//! Stream Parser
//!
//! Turns one structured output line into a flat [`Row`].
//!
//! ## Input
//!
//! ```json
//! {
//!   "TIMESTAMP": "2025-03-14T09:26:53.589793",
//!   "POWER": { "VIN": 24.1, "TMP2": 41.0 },
//!   "THERMOCOUPLE": { "X": { "TEMP": 35.2, "CJC": 24.9 } },
//!   "BATTERY_TEMP": 30.5
//! }
//! ```
//!
//! ## Output
//!
//! | Source                     | Column           |
//! |----------------------------|------------------|
//! | `TIMESTAMP`                | `TIME` (seconds) |
//! | `POWER.<k>`                | `POWER_<k>`      |
//! | `THERMOCOUPLE.<pos>.<k>`   | `THERMO_<pos>_<k>` |
//! | `THERMOCOUPLE.<pos>` (scalar) | `THERMO_<pos>` |
//! | other numeric top-level `k` | `k`             |
//!
//! `null` becomes NaN; strings, booleans and deeper nesting are skipped.
//!
//! ## Timestamp arithmetic
//!
//! `TIME` uses a fixed 365-day year and 30-day month:
//!
//! ```text
//! ((((Y*365 + M*30 + D) * 24 + h) * 60 + m) * 60) + s.ffffff
//! ```
//!
//! This is monotonic within a run and exact for spans that stay inside one
//! month. It is not calendar time: spans across a month end are off by the
//! month-length error, and values must not be compared across runs.

use log::trace;
use serde_json::{Map, Value};

use crate::constants::time::{
    DAYS_PER_MONTH_APPROX, DAYS_PER_YEAR_APPROX, HOURS_PER_DAY, MINUTES_PER_HOUR,
    SECONDS_PER_MINUTE,
};
use crate::errors::{ParseError, ParseResult};
use crate::reading::Row;

/// Field holding the frame timestamp
pub const TIMESTAMP_FIELD: &str = "TIMESTAMP";

/// Nested group of power-board readings
pub const POWER_GROUP: &str = "POWER";

/// Nested group of per-position thermocouple readings
pub const THERMO_GROUP: &str = "THERMOCOUPLE";

/// Column prefix for flattened thermocouple readings
pub const THERMO_PREFIX: &str = "THERMO";

/// Parse one structured line into a row
pub fn parse_line(line: &str) -> ParseResult<Row> {
    let value: Value = serde_json::from_str(line.trim())?;
    parse_record(&value)
}

/// Flatten an already-decoded record into a row
pub fn parse_record(record: &Value) -> ParseResult<Row> {
    let obj = record.as_object().ok_or(ParseError::NotAnObject)?;

    let stamp = obj
        .get(TIMESTAMP_FIELD)
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField(TIMESTAMP_FIELD))?;
    let mut row = Row::new(timestamp_to_seconds(stamp)?);

    for (field, value) in obj {
        match field.as_str() {
            TIMESTAMP_FIELD => {}
            POWER_GROUP => flatten_group(&mut row, POWER_GROUP, value),
            THERMO_GROUP => flatten_positions(&mut row, value),
            _ => insert_scalar(&mut row, field.clone(), value),
        }
    }

    Ok(row)
}

/// Reduce `YYYY-MM-DDTHH:MM:SS[.ffffff]` to seconds
pub fn timestamp_to_seconds(stamp: &str) -> ParseResult<f64> {
    let malformed = || ParseError::Timestamp(stamp.to_string());

    let (date, time) = stamp.trim().split_once(['T', ' ']).ok_or_else(malformed)?;

    let date_parts: Vec<f64> = date
        .split('-')
        .map(|p| p.parse::<u32>().map(f64::from))
        .collect::<Result<_, _>>()
        .map_err(|_| malformed())?;
    let [year, month, day] = date_parts[..] else {
        return Err(malformed());
    };

    let time_parts: Vec<&str> = time.split(':').collect();
    let [hour, minute, second] = time_parts[..] else {
        return Err(malformed());
    };
    let hour = hour.parse::<u32>().map_err(|_| malformed())? as f64;
    let minute = minute.parse::<u32>().map_err(|_| malformed())? as f64;
    let second = second.parse::<f64>().map_err(|_| malformed())?;
    if !second.is_finite() || second < 0.0 {
        return Err(malformed());
    }

    let days = year * DAYS_PER_YEAR_APPROX + month * DAYS_PER_MONTH_APPROX + day;
    let hours = days * HOURS_PER_DAY + hour;
    let minutes = hours * MINUTES_PER_HOUR + minute;
    Ok(minutes * SECONDS_PER_MINUTE + second)
}

fn flatten_group(row: &mut Row, prefix: &str, group: &Value) {
    let Some(map) = group.as_object() else {
        insert_scalar(row, prefix.to_string(), group);
        return;
    };
    for (key, value) in map {
        insert_scalar(row, format!("{}_{}", prefix, key), value);
    }
}

fn flatten_positions(row: &mut Row, group: &Value) {
    let Some(positions) = group.as_object() else {
        return;
    };
    for (pos, readings) in positions {
        let prefix = format!("{}_{}", THERMO_PREFIX, pos);
        match readings {
            Value::Object(map) => flatten_map(row, &prefix, map),
            scalar => insert_scalar(row, prefix, scalar),
        }
    }
}

fn flatten_map(row: &mut Row, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        insert_scalar(row, format!("{}_{}", prefix, key), value);
    }
}

fn insert_scalar(row: &mut Row, key: String, value: &Value) {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                row.insert(key, v);
            }
        }
        Value::Null => row.insert(key, f64::NAN),
        _ => trace!("Skipping non-numeric field {}", key),
    }
}
