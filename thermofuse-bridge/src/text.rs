//! Text-mode batching and column alignment
//!
//! Plain-text output arrives as `KEY: VALUE UNIT` lines, one reporting
//! cycle after another. A cycle is recognised by its keys: the first time
//! a key repeats, the previous cycle is complete.
//!
//! On flush the cycle's lines and the thermal readings are re-emitted with
//! one shared layout:
//!
//! ```text
//! X:   1.500 degC
//! Y:  12.340 degC
//! Z:   3.100 degC
//! ^^  ^^^^^^
//! |   value: widest integer part + '.' + widest fraction
//! key column: widest key + ':'
//! ```
//!
//! Integer width is taken over every entry. Fraction width is taken from
//! the child's lines only; injected values are printed at that precision.

use std::collections::HashSet;

use thermofuse_core::constants::THERMAL_UNIT;
use thermofuse_core::Readings;

/// Group key of a text line: everything before the first ':'
pub fn group_key(line: &str) -> Option<&str> {
    line.split_once(':').map(|(key, _)| key.trim())
}

/// One `KEY: VALUE UNIT` entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    pub key: String,
    pub value: f64,
    pub unit: String,
    int_width: usize,
    frac_width: usize,
}

impl TextEntry {
    /// Parse a child line; `None` if the value is not numeric
    pub fn parse(line: &str) -> Option<Self> {
        let (key, rest) = line.split_once(':')?;
        let rest = rest.trim();
        let (value_str, unit) = match rest.split_once(char::is_whitespace) {
            Some((v, u)) => (v, u.trim()),
            None => (rest, ""),
        };
        let value = value_str.parse::<f64>().ok()?;
        let (int_width, frac_width) = match value_str.find('.') {
            Some(dot) => (dot, value_str.len() - dot - 1),
            None => (value_str.len(), 0),
        };
        Some(Self {
            key: key.trim().to_string(),
            value,
            unit: unit.to_string(),
            int_width,
            frac_width,
        })
    }

    /// Entry for an injected reading
    pub fn injected(key: &str, value: f64) -> Self {
        let shown = value.to_string();
        let int_width = shown.split('.').next().map_or(0, str::len);
        Self {
            key: key.to_string(),
            value,
            unit: THERMAL_UNIT.to_string(),
            int_width,
            frac_width: 0,
        }
    }
}

/// Lines of the current reporting cycle
#[derive(Debug, Default)]
pub struct TextBatch {
    lines: Vec<String>,
    keys: HashSet<String>,
}

impl TextBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a line with this group key is already pending
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn push(&mut self, line: String) {
        if let Some(key) = group_key(&line) {
            self.keys.insert(key.to_string());
        }
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Format the pending cycle with `readings` and reset
    pub fn flush(&mut self, readings: &Readings) -> Vec<String> {
        let lines = std::mem::take(&mut self.lines);
        self.keys.clear();
        align(&lines, readings)
    }
}

enum Slot {
    Entry(TextEntry),
    Verbatim(String),
}

/// Lay out `lines` plus `readings` on shared columns
///
/// A line whose value cannot be parsed is passed through as-is and does
/// not take part in the width computation.
pub fn align(lines: &[String], readings: &Readings) -> Vec<String> {
    let slots: Vec<Slot> = lines
        .iter()
        .map(|line| match TextEntry::parse(line) {
            Some(entry) => Slot::Entry(entry),
            None => Slot::Verbatim(line.clone()),
        })
        .chain(
            readings
                .iter()
                .map(|(key, value)| Slot::Entry(TextEntry::injected(key, value))),
        )
        .collect();

    let entries = || {
        slots.iter().filter_map(|slot| match slot {
            Slot::Entry(entry) => Some(entry),
            Slot::Verbatim(_) => None,
        })
    };
    let key_width = entries().map(|e| e.key.len()).max().unwrap_or(0) + 1;
    let int_width = entries().map(|e| e.int_width).max().unwrap_or(0);
    let frac_width = entries().map(|e| e.frac_width).max().unwrap_or(0);
    let value_width = int_width + frac_width + 1;

    slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Entry(e) => format!(
                "{:<kw$}  {:>vw$.prec$} {}",
                format!("{}:", e.key),
                e.value,
                e.unit,
                kw = key_width,
                vw = value_width,
                prec = frac_width,
            )
            .trim_end()
            .to_string(),
            Slot::Verbatim(line) => line,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shared_columns_across_child_and_injected() {
        let readings: Readings = [("Z", 3.1)].into_iter().collect();
        let out = align(&lines(&["X: 1.500 degC", "Y: 12.340 degC"]), &readings);
        assert_eq!(
            out,
            vec!["X:   1.500 degC", "Y:  12.340 degC", "Z:   3.100 degC"]
        );
    }

    #[test]
    fn wide_injected_key_widens_key_column() {
        let readings: Readings = [("MOTOR_TEMP", 41.25)].into_iter().collect();
        let out = align(&lines(&["VIN: 24.10 V"]), &readings);
        assert_eq!(out[0], "VIN:         24.10 V");
        assert_eq!(out[1], "MOTOR_TEMP:  41.25 degC");
    }

    #[test]
    fn nan_reading_keeps_layout() {
        let readings: Readings = [("T", f64::NAN)].into_iter().collect();
        let out = align(&lines(&["A: 1.0 V"]), &readings);
        assert_eq!(out[0], "A:    1.0 V");
        assert_eq!(out[1], "T:    NaN degC");
    }

    #[test]
    fn unparsable_value_passes_through() {
        let out = align(&lines(&["MODE: idle", "A: 2.5 V"]), &Readings::new());
        assert_eq!(out, vec!["MODE: idle", "A:  2.5 V"]);
    }

    #[test]
    fn unitless_lines_are_trimmed() {
        let out = align(&lines(&["COUNT: 12"]), &Readings::new());
        assert_eq!(out, vec!["COUNT:   12"]);
    }

    #[test]
    fn batch_tracks_keys_and_resets() {
        let mut batch = TextBatch::new();
        batch.push("A: 1.0 V".into());
        batch.push("B: 2.0 V".into());
        assert!(batch.contains("A"));
        assert!(!batch.contains("C"));
        let out = batch.flush(&Readings::new());
        assert_eq!(out.len(), 2);
        assert!(batch.is_empty());
        assert!(!batch.contains("A"));
    }
}
