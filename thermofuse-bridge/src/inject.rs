//! Structured-mode injection
//!
//! Thermal keys are merged into the record at the top level. An existing
//! field with the same name is overwritten in place, so it keeps its
//! position; new keys are appended after the record's own fields.

use serde_json::{Map, Value};
use thermofuse_core::Readings;

/// Merge `readings` into `record`
pub fn inject(record: &mut Map<String, Value>, readings: &Readings) {
    for (key, value) in readings.iter() {
        // NaN has no JSON form and becomes null
        record.insert(key.to_string(), Value::from(value));
    }
}

/// Parse `line`, inject `readings` and serialize the result
///
/// `None` when the line is not a JSON object; the caller switches to text
/// mode on that.
pub fn fuse_record(line: &str, readings: &Readings) -> Option<String> {
    let Ok(Value::Object(mut record)) = serde_json::from_str::<Value>(line) else {
        return None;
    };
    inject(&mut record, readings);
    serde_json::to_string(&Value::Object(record)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(pairs: &[(&str, f64)]) -> Readings {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn appends_new_keys() {
        let out = fuse_record(r#"{"a":1}"#, &readings(&[("B", 2.5)])).unwrap();
        assert_eq!(out, r#"{"a":1,"B":2.5}"#);
    }

    #[test]
    fn injected_keys_win_in_place() {
        let out = fuse_record(r#"{"B":0,"a":1}"#, &readings(&[("B", 2.5)])).unwrap();
        assert_eq!(out, r#"{"B":2.5,"a":1}"#);
    }

    #[test]
    fn nan_becomes_null() {
        let out = fuse_record(r#"{"a":1}"#, &readings(&[("T", f64::NAN)])).unwrap();
        assert_eq!(out, r#"{"a":1,"T":null}"#);
    }

    #[test]
    fn nested_groups_are_untouched() {
        let line = r#"{"TIMESTAMP":"2025-06-10T12:00:00","POWER":{"VIN":24.0}}"#;
        let out = fuse_record(line, &readings(&[("MOTOR_TEMP", 30.0)])).unwrap();
        assert_eq!(
            out,
            r#"{"TIMESTAMP":"2025-06-10T12:00:00","POWER":{"VIN":24.0},"MOTOR_TEMP":30.0}"#
        );
    }

    #[test]
    fn non_objects_are_rejected() {
        let r = readings(&[("B", 1.0)]);
        assert!(fuse_record("VIN: 24.0 V", &r).is_none());
        assert!(fuse_record("[1,2]", &r).is_none());
        assert!(fuse_record(r#""a:b""#, &r).is_none());
    }
}
