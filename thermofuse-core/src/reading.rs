//! Ordered key/value containers for sampled data
//!
//! Both the thermal mapping returned by a fetch and the rows produced by the
//! stream parser need to keep insertion order: it decides the order keys are
//! injected into output lines and the column order of the log. A small
//! vector beats a hash map at these sizes (a handful to a few dozen keys).

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which every row carries its timestamp in seconds
pub const TIME_KEY: &str = "TIME";

/// Thermal readings keyed by source key, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings {
    entries: Vec<(String, f64)>,
}

impl Readings {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapping sized for `n` sources
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Insert or overwrite a value, keeping the key's first position
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Readings {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut readings = Readings::new();
        for (k, v) in iter {
            readings.insert(k, v);
        }
        readings
    }
}

/// One parsed output line: `TIME` plus flattened measurements
///
/// Created per consumed line and discarded once the controller is done
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Readings,
}

impl Row {
    /// Start a row at `time` seconds
    pub fn new(time: f64) -> Self {
        let mut values = Readings::new();
        values.insert(TIME_KEY, time);
        Self { values }
    }

    /// Build a row from `TIME` plus extra pairs
    pub fn from_pairs<K: Into<String>>(time: f64, pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        let mut row = Row::new(time);
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    /// Timestamp in seconds
    pub fn time(&self) -> f64 {
        self.values.get(TIME_KEY).unwrap_or(f64::NAN)
    }

    /// Insert or overwrite a measurement
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key, value);
    }

    /// Look up a measurement (including `TIME`)
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key)
    }

    /// Number of columns, `TIME` included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a row holds at least `TIME`
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Columns in encounter order, `TIME` first
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter()
    }

    /// Column names in encounter order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, &v)?;
        }
        map.end()
    }
}
