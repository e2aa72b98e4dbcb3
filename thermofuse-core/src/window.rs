//! Time-Bounded Sample Window
//!
//! ## Overview
//!
//! Steady-state detection needs the recent history of one key: every sample
//! from the last W seconds, oldest first. Unlike a count-bounded ring
//! buffer, the window's length depends on the producer's cadence, so it is
//! backed by a `VecDeque` and trimmed from the front by time span rather
//! than by capacity.
//!
//! ```text
//! push(t, v) ──► [ (t0,v0) (t1,v1) ... (tn,vn) ] ◄── prune_span(W)
//!                  oldest                newest      pops front while
//!                                                    tn - t0 >= W
//! ```
//!
//! ## Invariants
//!
//! - Timestamps are non-decreasing front to back. A sample older than the
//!   newest one is clamped to the newest timestamp on push so span
//!   arithmetic never goes negative.
//! - `span()` is `newest.time - oldest.time`, and 0 for fewer than two
//!   samples.
//! - Pruning never empties the window: the newest sample always stays.

use std::collections::VecDeque;

use crate::time::Seconds;

/// Single value with the time it was observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSample {
    pub time: Seconds,
    pub value: f64,
}

/// Front-pruned sequence of samples for one key
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: VecDeque<TimedSample>,
}

impl SampleWindow {
    /// Create an empty window
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample at the back
    pub fn push(&mut self, time: Seconds, value: f64) {
        let time = match self.samples.back() {
            Some(last) if time < last.time => last.time,
            _ => time,
        };
        self.samples.push_back(TimedSample { time, value });
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample is stored
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest stored sample
    pub fn first(&self) -> Option<&TimedSample> {
        self.samples.front()
    }

    /// Newest stored sample
    pub fn last(&self) -> Option<&TimedSample> {
        self.samples.back()
    }

    /// Time between the oldest and newest sample
    pub fn span(&self) -> Seconds {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &TimedSample> {
        self.samples.iter()
    }

    /// Arithmetic mean of the stored values
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.value).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Population standard deviation of the stored values
    ///
    /// NaN if any stored value is NaN.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var: f64 = self
            .samples
            .iter()
            .map(|s| (s.value - mean) * (s.value - mean))
            .sum::<f64>()
            / self.samples.len() as f64;
        Some(var.sqrt())
    }

    /// Drop oldest samples while the span is at least `max_span`
    ///
    /// Returns the number of samples removed.
    pub fn prune_span(&mut self, max_span: Seconds) -> usize {
        let mut removed = 0;
        while self.samples.len() > 1 && self.span() >= max_span {
            self.samples.pop_front();
            removed += 1;
        }
        removed
    }

    /// Remove every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_window() {
        let window = SampleWindow::new();
        assert!(window.is_empty());
        assert_eq!(window.span(), 0.0);
        assert!(window.std_dev().is_none());
        assert!(window.last().is_none());
    }

    #[test]
    fn span_and_stats() {
        let mut window = SampleWindow::new();
        window.push(1.0, 2.0);
        window.push(2.0, 4.0);
        window.push(4.0, 6.0);
        assert_eq!(window.span(), 3.0);
        assert_eq!(window.mean(), Some(4.0));
        let std = window.std_dev().unwrap();
        assert!((std - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn out_of_order_time_is_clamped() {
        let mut window = SampleWindow::new();
        window.push(5.0, 1.0);
        window.push(3.0, 1.0);
        assert_eq!(window.last().unwrap().time, 5.0);
        assert_eq!(window.span(), 0.0);
    }

    #[test]
    fn prune_keeps_span_below_limit() {
        let mut window = SampleWindow::new();
        for t in 0..=10 {
            window.push(t as f64, 1.0);
        }
        let removed = window.prune_span(4.0);
        assert_eq!(removed, 7);
        assert_eq!(window.first().unwrap().time, 7.0);
        assert_eq!(window.span(), 3.0);
    }

    #[test]
    fn nan_poisons_std_dev() {
        let mut window = SampleWindow::new();
        window.push(0.0, 1.0);
        window.push(1.0, f64::NAN);
        assert!(window.std_dev().unwrap().is_nan());
    }

    proptest! {
        #[test]
        fn prune_never_empties_and_bounds_span(
            steps in proptest::collection::vec(0.0f64..5.0, 1..60),
            limit in 0.5f64..20.0,
        ) {
            let mut window = SampleWindow::new();
            let mut t = 0.0;
            for dt in steps {
                t += dt;
                window.push(t, 1.0);
                window.prune_span(limit);
                prop_assert!(!window.is_empty());
                prop_assert!(window.len() == 1 || window.span() < limit);
            }
        }
    }
}
