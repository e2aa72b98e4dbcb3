//! Time sources for the control loop
//!
//! Elapsed-time decisions (defer window, time limit) are measured on a
//! clock rather than on row timestamps, so a stalled producer cannot hold
//! a run open past its limit. The clock is a trait so tests can drive it:
//! - `MonotonicTime`: real elapsed time since creation
//! - `FixedTime`: manually advanced, shared between clones

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Seconds, as used throughout rows and windows
pub type Seconds = f64;

/// Source of elapsed time
pub trait TimeSource {
    /// Seconds since the source's origin
    fn now(&self) -> Seconds;
}

/// Monotonic wall-clock time since construction
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Seconds {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually driven time source for tests and replays
///
/// Clones share the same clock, so a test can keep one handle and advance
/// it while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    seconds: Rc<Cell<Seconds>>,
}

impl FixedTime {
    pub fn new(seconds: Seconds) -> Self {
        Self {
            seconds: Rc::new(Cell::new(seconds)),
        }
    }

    pub fn set(&self, seconds: Seconds) {
        self.seconds.set(seconds);
    }

    pub fn advance(&self, seconds: Seconds) {
        self.seconds.set(self.seconds.get() + seconds);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Seconds {
        self.seconds.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}
