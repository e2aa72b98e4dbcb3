//! Threshold Guard
//!
//! Absolute temperature safety limit. Stateless: the verdict for a row
//! depends only on that row. Tripping the guard is a stop condition, not an
//! error; the caller decides how to wind the run down.
//!
//! - A monitored key at or above the threshold fails the row.
//! - A monitored key absent from the row counts as 0 and passes.
//! - NaN never compares at-or-above, so a failed sensor read does not trip
//!   the guard on its own.

use crate::reading::Row;

/// The first monitored key found at or above the limit
#[derive(Debug, Clone, PartialEq)]
pub struct Breach {
    pub key: String,
    pub value: f64,
    pub threshold: f64,
}

/// Absolute-value limit over a fixed set of keys
#[derive(Debug, Clone)]
pub struct ThresholdGuard {
    threshold: f64,
    keys: Vec<String>,
}

impl ThresholdGuard {
    /// Guard `keys` against `threshold`
    pub fn new<K: Into<String>>(threshold: f64, keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            threshold,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured limit
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Monitored keys
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Ok when every monitored key is below the limit
    pub fn check(&self, row: &Row) -> Result<(), Breach> {
        for key in &self.keys {
            let value = row.get(key).unwrap_or(0.0);
            if value >= self.threshold {
                return Err(Breach {
                    key: key.clone(),
                    value,
                    threshold: self.threshold,
                });
            }
        }
        Ok(())
    }

    /// Convenience form of [`ThresholdGuard::check`]
    pub fn passes(&self, row: &Row) -> bool {
        self.check(row).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn limit_is_inclusive() {
        let guard = ThresholdGuard::new(70.0, ["X"]);
        assert!(!guard.passes(&Row::from_pairs(0.0, [("X", 71.0)])));
        assert!(!guard.passes(&Row::from_pairs(0.0, [("X", 70.0)])));
        assert!(guard.passes(&Row::from_pairs(0.0, [("X", 69.9)])));
    }

    #[test]
    fn breach_names_the_key() {
        let guard = ThresholdGuard::new(50.0, ["A", "B"]);
        let row = Row::from_pairs(0.0, [("A", 10.0), ("B", 55.5)]);
        let breach = guard.check(&row).unwrap_err();
        assert_eq!(breach.key, "B");
        assert_eq!(breach.value, 55.5);
    }

    #[test]
    fn absent_and_nan_keys_pass() {
        let guard = ThresholdGuard::new(70.0, ["X", "Y"]);
        assert!(guard.passes(&Row::new(0.0)));
        assert!(guard.passes(&Row::from_pairs(0.0, [("X", f64::NAN)])));
        // absent counts as zero, so a non-positive limit trips on it
        assert!(!ThresholdGuard::new(0.0, ["X"]).passes(&Row::new(0.0)));
    }

    #[test]
    fn unmonitored_keys_are_ignored() {
        let guard = ThresholdGuard::new(70.0, ["X"]);
        assert!(guard.passes(&Row::from_pairs(0.0, [("OTHER", 500.0)])));
    }

    proptest! {
        #[test]
        fn verdict_matches_max_of_monitored(values in proptest::collection::vec(-50.0f64..150.0, 1..8)) {
            let keys: Vec<String> = (0..values.len()).map(|i| format!("K{i}")).collect();
            let guard = ThresholdGuard::new(70.0, keys.clone());
            let row = Row::from_pairs(0.0, keys.into_iter().zip(values.iter().copied()));
            let max = values.iter().copied().fold(f64::MIN, f64::max);
            prop_assert_eq!(guard.passes(&row), max < 70.0);
        }
    }
}
