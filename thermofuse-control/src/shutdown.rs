//! Termination guard
//!
//! Owns the actuator for the whole run and guarantees it ends idle:
//!
//! - [`TerminationGuard::terminate`] sends `idle` until it succeeds,
//!   sleeping `retry_delay` between attempts.
//! - Once an idle has succeeded, further calls send nothing.
//! - `Drop` calls `terminate`, so an early return, an error or a panic
//!   unwinding through the owner still idles the device.
//!
//! ```text
//! terminated: false ──idle() ok──► true     (never back)
//! ```

use std::time::Duration;

use log::{info, warn};
use thermofuse_core::constants::monitor::DEFAULT_IDLE_RETRY_MS;

use crate::actuator::{Activation, Actuator};
use crate::errors::ActuatorResult;

/// Actuator wrapper that idles the device exactly once, at the end
pub struct TerminationGuard<A: Actuator> {
    actuator: A,
    terminated: bool,
    retry_delay: Duration,
    idle_attempts: usize,
}

impl<A: Actuator> TerminationGuard<A> {
    pub fn new(actuator: A) -> Self {
        Self::with_retry_delay(actuator, Duration::from_millis(DEFAULT_IDLE_RETRY_MS))
    }

    pub fn with_retry_delay(actuator: A, retry_delay: Duration) -> Self {
        Self {
            actuator,
            terminated: false,
            retry_delay,
            idle_attempts: 0,
        }
    }

    /// Start the device
    pub fn activate(&mut self, activation: Activation) -> ActuatorResult<()> {
        self.actuator.activate(activation)
    }

    /// True once an idle command has succeeded
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Idle commands sent so far, failed ones included
    pub fn idle_attempts(&self) -> usize {
        self.idle_attempts
    }

    /// Idle the device, retrying until it succeeds; no-op afterwards
    pub fn terminate(&mut self) {
        while !self.terminated {
            info!("Idling device");
            self.idle_attempts += 1;
            match self.actuator.idle() {
                Ok(()) => {
                    self.terminated = true;
                    info!("Device idle");
                }
                Err(e) => {
                    warn!("Idle attempt {} failed: {}", self.idle_attempts, e);
                    std::thread::sleep(self.retry_delay);
                }
            }
        }
    }
}

impl<A: Actuator> Drop for TerminationGuard<A> {
    fn drop(&mut self) {
        self.terminate();
    }
}
