//! Steady-State Detector
//!
//! ## Overview
//!
//! A thermal test is done when every monitored temperature has stopped
//! moving. "Stopped moving" is measured per key as the standard deviation
//! of its samples over a sliding time window: below a threshold, the key is
//! steady.
//!
//! ## Parameters
//!
//! | Parameter  | Meaning                                              |
//! |------------|------------------------------------------------------|
//! | `window`   | W: samples older than this (relative to the newest) are dropped after each evaluation |
//! | `threshold`| T: a key is steady iff std < T                         |
//! | `interval` | I: minimum time between evaluations of a key, and minimum history span before the first |
//!
//! All three are optional. With any one missing the detector is disabled
//! and always reports not-steady.
//!
//! ## Evaluation
//!
//! ```text
//! on row at time t, for each monitored key k:
//!   append (t, row[k]) to history[k]
//!   if t - last_eval[k] < I  or  span(history[k]) < I:
//!       k is skipped                     (counts as not-steady this pass)
//!   else:
//!       steady[k] = std(history[k]) < T
//!       last_eval[k] = t
//!       prune history[k] while span >= W
//! aggregate = every key steady in this same pass
//! ```
//!
//! `last_eval[k]` starts at the time of the first row the detector saw.
//! Requiring every key in the same pass keeps the aggregate conservative:
//! two keys that were each briefly steady at different moments do not
//! stop the run.

use serde::{Deserialize, Serialize};

use crate::config::require_positive;
use crate::errors::ConfigResult;
use crate::reading::Row;
use crate::time::Seconds;
use crate::window::SampleWindow;

/// Optional steady-state parameters as they appear in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SteadyConfig {
    /// Window duration W in seconds
    #[serde(default)]
    pub window_secs: Option<f64>,
    /// Standard deviation threshold T
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Evaluation interval I in seconds
    #[serde(default)]
    pub interval_secs: Option<f64>,
}

impl SteadyConfig {
    /// Fully specified configuration
    pub fn new(window_secs: f64, threshold: f64, interval_secs: f64) -> Self {
        Self {
            window_secs: Some(window_secs),
            threshold: Some(threshold),
            interval_secs: Some(interval_secs),
        }
    }

    /// Reject non-positive values; absent values are allowed
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive(self.window_secs, "steady_window")?;
        require_positive(self.threshold, "steady_threshold")?;
        require_positive(self.interval_secs, "steady_interval")?;
        Ok(())
    }

    /// True when all three parameters are present
    pub fn is_enabled(&self) -> bool {
        self.params().is_some()
    }

    fn params(&self) -> Option<Params> {
        Some(Params {
            window: self.window_secs?,
            threshold: self.threshold?,
            interval: self.interval_secs?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Params {
    window: Seconds,
    threshold: f64,
    interval: Seconds,
}

/// Outcome for one key in one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyVerdict {
    /// Key absent from the row
    Missing,
    /// Not evaluated this pass (interval not elapsed or span too short)
    Skipped,
    /// Evaluated, std below threshold
    Steady { std_dev: f64 },
    /// Evaluated, std at or above threshold (or NaN)
    Unsteady { std_dev: f64 },
}

impl KeyVerdict {
    pub fn is_steady(&self) -> bool {
        matches!(self, KeyVerdict::Steady { .. })
    }
}

/// Per-key verdicts for one pass plus the aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct SteadyReport {
    pub verdicts: Vec<(String, KeyVerdict)>,
    pub steady: bool,
}

#[derive(Debug, Clone)]
struct KeyHistory {
    key: String,
    window: SampleWindow,
    last_eval: Option<Seconds>,
}

/// Sliding-window variance check over a fixed set of keys
///
/// Owns one history per monitored key; nothing outside the detector reads
/// or writes them.
#[derive(Debug, Clone)]
pub struct SteadyStateDetector {
    params: Option<Params>,
    histories: Vec<KeyHistory>,
    started: Option<Seconds>,
}

impl SteadyStateDetector {
    /// Create a detector for `keys`
    pub fn new<K: Into<String>>(config: SteadyConfig, keys: impl IntoIterator<Item = K>) -> Self {
        let histories = keys
            .into_iter()
            .map(|k| KeyHistory {
                key: k.into(),
                window: SampleWindow::new(),
                last_eval: None,
            })
            .collect();
        Self {
            params: config.params(),
            histories,
            started: None,
        }
    }

    /// A detector that never reports steady
    pub fn disabled() -> Self {
        Self::new(SteadyConfig::default(), Vec::<String>::new())
    }

    /// True when all parameters were supplied
    pub fn is_enabled(&self) -> bool {
        self.params.is_some()
    }

    /// Samples currently held for `key`
    pub fn history_len(&self, key: &str) -> Option<usize> {
        self.histories
            .iter()
            .find(|h| h.key == key)
            .map(|h| h.window.len())
    }

    /// Feed one row; true when every key is steady in this pass
    pub fn update(&mut self, row: &Row) -> bool {
        self.evaluate(row).steady
    }

    /// Feed one row and return the per-key detail
    pub fn evaluate(&mut self, row: &Row) -> SteadyReport {
        let Some(params) = self.params else {
            return SteadyReport {
                verdicts: Vec::new(),
                steady: false,
            };
        };

        let time = row.time();
        let started = *self.started.get_or_insert(time);

        let verdicts: Vec<(String, KeyVerdict)> = self
            .histories
            .iter_mut()
            .map(|history| {
                let verdict = Self::evaluate_key(history, row, time, started, params);
                (history.key.clone(), verdict)
            })
            .collect();

        let steady = !verdicts.is_empty() && verdicts.iter().all(|(_, v)| v.is_steady());
        SteadyReport { verdicts, steady }
    }

    fn evaluate_key(
        history: &mut KeyHistory,
        row: &Row,
        time: Seconds,
        started: Seconds,
        params: Params,
    ) -> KeyVerdict {
        let Some(value) = row.get(&history.key) else {
            return KeyVerdict::Missing;
        };
        history.window.push(time, value);

        let since_last = time - history.last_eval.unwrap_or(started);
        if since_last < params.interval || history.window.span() < params.interval {
            return KeyVerdict::Skipped;
        }

        let std_dev = history.window.std_dev().unwrap_or(f64::NAN);
        history.last_eval = Some(time);
        history.window.prune_span(params.window);

        if std_dev < params.threshold {
            KeyVerdict::Steady { std_dev }
        } else {
            KeyVerdict::Unsteady { std_dev }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(t: f64, pairs: &[(&str, f64)]) -> Row {
        Row::from_pairs(t, pairs.iter().map(|(k, v)| (*k, *v)))
    }

    #[test]
    fn constant_signal_is_steady_at_first_full_interval() {
        let mut detector = SteadyStateDetector::new(SteadyConfig::new(10.0, 0.5, 5.0), ["X"]);
        let first_steady = (0..12)
            .map(|t| t as f64)
            .find(|t| detector.update(&row(*t, &[("X", 20.0)])));
        assert_eq!(first_steady, Some(5.0));
    }

    #[test]
    fn alternating_signal_never_steady() {
        let mut detector = SteadyStateDetector::new(SteadyConfig::new(10.0, 0.5, 5.0), ["X"]);
        for t in 0..12 {
            let value = if t % 2 == 0 { 0.0 } else { 100.0 };
            assert!(!detector.update(&row(t as f64, &[("X", value)])));
        }
    }

    #[test]
    fn missing_parameter_disables_detection() {
        let config = SteadyConfig {
            window_secs: Some(10.0),
            threshold: None,
            interval_secs: Some(1.0),
        };
        let mut detector = SteadyStateDetector::new(config, ["X"]);
        assert!(!detector.is_enabled());
        for t in 0..20 {
            assert!(!detector.update(&row(t as f64, &[("X", 1.0)])));
        }
        assert_eq!(detector.history_len("X"), Some(0));
    }

    #[test]
    fn every_key_must_settle_in_the_same_pass() {
        let mut detector =
            SteadyStateDetector::new(SteadyConfig::new(4.0, 0.5, 2.0), ["A", "B"]);
        // B keeps swinging, A is flat
        for t in 0..10 {
            let b = if t % 2 == 0 { 10.0 } else { 30.0 };
            let report = detector.evaluate(&row(t as f64, &[("A", 5.0), ("B", b)]));
            assert!(!report.steady);
        }
    }

    #[test]
    fn missing_key_is_not_steady() {
        let mut detector = SteadyStateDetector::new(SteadyConfig::new(4.0, 0.5, 1.0), ["A", "B"]);
        for t in 0..5 {
            let report = detector.evaluate(&row(t as f64, &[("A", 1.0)]));
            assert!(!report.steady);
            assert_eq!(report.verdicts[1].1, KeyVerdict::Missing);
        }
    }

    #[test]
    fn history_is_pruned_to_window() {
        let mut detector = SteadyStateDetector::new(SteadyConfig::new(4.0, 0.5, 1.0), ["X"]);
        for t in 0..50 {
            detector.update(&row(t as f64, &[("X", 1.0)]));
        }
        // span kept below 4 s at 1 Hz: at most 4 samples after pruning
        assert!(detector.history_len("X").unwrap() <= 4);
    }

    #[test]
    fn nan_sample_blocks_steady() {
        let mut detector = SteadyStateDetector::new(SteadyConfig::new(10.0, 0.5, 2.0), ["X"]);
        let mut any = false;
        for t in 0..6 {
            let v = if t == 1 { f64::NAN } else { 20.0 };
            any |= detector.update(&row(t as f64, &[("X", v)]));
        }
        assert!(!any);
    }

    #[test]
    fn validation_rejects_non_positive() {
        assert!(SteadyConfig::new(10.0, 0.5, 5.0).validate().is_ok());
        assert!(SteadyConfig::new(0.0, 0.5, 5.0).validate().is_err());
        assert!(SteadyConfig::default().validate().is_ok());
    }
}
