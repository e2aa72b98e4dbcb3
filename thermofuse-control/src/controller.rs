//! Device Controller
//!
//! ## State machine
//!
//! ```text
//!            defer configured               defer elapsed
//!  start ───────────────────► Deferred ──────────────────► Active
//!    │                           │      (activate once)      │
//!    └── no defer ──► Active     └──────────┬────────────────┘
//!        (activate once)                    ▼
//!                                        Stopped   (entered once)
//! ```
//!
//! ## Per row
//!
//! 1. log the row
//! 2. print a summary
//! 3. threshold guard            -> stop: threshold exceeded
//! 4. elapsed time vs limit      -> stop: time limit
//! 5. still deferred             -> next row
//! 6. defer just elapsed         -> activate the actuator
//! 7. steady-state detector      -> stop: steady state
//!
//! Elapsed time is read from the controller's clock, not from row
//! timestamps.
//!
//! ## Termination
//!
//! The actuator lives inside a [`TerminationGuard`]. [`Controller::run`]
//! idles it before returning on every path, and the guard's `Drop` covers
//! anything that unwinds past `run`.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use log::{error, info};
use thermofuse_core::constants::INTERRUPT_EXIT_CODE;
use thermofuse_core::{
    Interrupt, Row, RowLogger, Seconds, SteadyStateDetector, ThresholdGuard, TimeSource,
};

use crate::actuator::{Activation, Actuator};
use crate::config::MonitorConfig;
use crate::errors::ControlResult;
use crate::shutdown::TerminationGuard;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Logging and guarding only; activation and steady checks wait
    Deferred,
    /// Fully running
    Active,
    /// Finished; the actuator has been idled
    Stopped,
}

/// Why a run ended without an error
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// A monitored key reached the safety limit
    ThresholdExceeded { key: String, value: f64 },
    /// The run lasted longer than the time limit
    TimeLimit,
    /// Every steady key settled
    SteadyState,
    /// The data source closed its stream
    StreamEnded,
    /// SIGINT or SIGTERM
    Interrupted,
}

impl StopReason {
    /// Process exit code for a run that ended this way
    pub fn exit_code(&self) -> i32 {
        match self {
            StopReason::Interrupted => INTERRUPT_EXIT_CODE,
            _ => 0,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::ThresholdExceeded { key, value } => {
                write!(f, "temperature threshold exceeded ({} = {})", key, value)
            }
            StopReason::TimeLimit => write!(f, "time limit reached"),
            StopReason::SteadyState => write!(f, "readings are steady"),
            StopReason::StreamEnded => write!(f, "data stream ended"),
            StopReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Drives one run over a stream of rows
pub struct Controller<A: Actuator, T: TimeSource, L: Write> {
    guard: ThresholdGuard,
    detector: SteadyStateDetector,
    logger: RowLogger<L>,
    summary: Box<dyn Write>,
    clock: T,
    threshold: f64,
    time_limit: Seconds,
    defer: Option<Seconds>,
    activation: Option<Activation>,
    interrupt: Interrupt,
    phase: Phase,
    started: Seconds,
    rows: usize,
    shutdown: TerminationGuard<A>,
}

impl<A: Actuator, T: TimeSource, L: Write> Controller<A, T, L> {
    /// Build a controller from a validated config
    ///
    /// The clock's current reading is taken as the start of the run.
    pub fn new(
        config: &MonitorConfig,
        actuator: A,
        clock: T,
        logger: RowLogger<L>,
    ) -> ControlResult<Self> {
        config.validate()?;
        let shutdown = TerminationGuard::with_retry_delay(
            actuator,
            Duration::from_millis(config.idle_retry_ms),
        );
        let defer = config.defer_secs.filter(|d| *d > 0.0);
        let started = clock.now();

        Ok(Self {
            guard: ThresholdGuard::new(config.threshold, config.threshold_keys.iter().cloned()),
            detector: SteadyStateDetector::new(config.steady, config.steady_keys.iter().cloned()),
            logger,
            summary: Box::new(std::io::stdout()),
            clock,
            threshold: config.threshold,
            time_limit: config.time_limit_secs,
            defer,
            activation: config.activation()?,
            interrupt: Interrupt::new(),
            phase: if defer.is_some() {
                Phase::Deferred
            } else {
                Phase::Active
            },
            started,
            rows: 0,
            shutdown,
        })
    }

    /// Write per-row summaries somewhere other than stdout
    pub fn with_summary(mut self, summary: Box<dyn Write>) -> Self {
        self.summary = summary;
        self
    }

    /// Stop with [`StopReason::Interrupted`] once `interrupt` fires
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rows consumed so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// True once the actuator has been idled
    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_terminated()
    }

    /// Consume rows until a stop condition, an error or the end of stream
    ///
    /// The actuator is idle when this returns, whatever the outcome.
    pub fn run<I>(&mut self, rows: I) -> ControlResult<StopReason>
    where
        I: IntoIterator<Item = ControlResult<Row>>,
    {
        let result = if self.phase == Phase::Stopped {
            Ok(StopReason::StreamEnded)
        } else {
            self.drive(rows)
        };
        self.phase = Phase::Stopped;
        self.shutdown.terminate();

        match &result {
            Ok(reason) => info!("Stopping the test after {} rows: {}", self.rows, reason),
            Err(e) => error!("Stopping the test after {} rows: {}", self.rows, e),
        }
        result
    }

    fn drive<I>(&mut self, rows: I) -> ControlResult<StopReason>
    where
        I: IntoIterator<Item = ControlResult<Row>>,
    {
        if self.phase == Phase::Active {
            self.activate()?;
        }

        for row in rows {
            if self.interrupt.is_triggered() {
                return Ok(StopReason::Interrupted);
            }
            let row = row?;
            self.rows += 1;
            if let Some(reason) = self.step(&row)? {
                return Ok(reason);
            }
        }

        if self.interrupt.is_triggered() {
            Ok(StopReason::Interrupted)
        } else {
            Ok(StopReason::StreamEnded)
        }
    }

    fn step(&mut self, row: &Row) -> ControlResult<Option<StopReason>> {
        self.logger.log(row)?;
        serde_json::to_writer_pretty(&mut self.summary, row).map_err(std::io::Error::from)?;
        writeln!(self.summary)?;

        if let Err(breach) = self.guard.check(row) {
            info!("Temperature threshold of {} degC exceeded", self.threshold);
            return Ok(Some(StopReason::ThresholdExceeded {
                key: breach.key,
                value: breach.value,
            }));
        }

        let elapsed = self.clock.now() - self.started;
        if elapsed > self.time_limit {
            info!("Time limit of {} seconds reached", self.time_limit);
            return Ok(Some(StopReason::TimeLimit));
        }

        if self.phase == Phase::Deferred {
            if self.defer.is_some_and(|defer| elapsed < defer) {
                return Ok(None);
            }
            info!("Defer window over after {:.1} s", elapsed);
            self.phase = Phase::Active;
            self.activate()?;
        }

        if self.detector.update(row) {
            return Ok(Some(StopReason::SteadyState));
        }
        Ok(None)
    }

    fn activate(&mut self) -> ControlResult<()> {
        if let Some(activation) = self.activation.take() {
            self.shutdown.activate(activation)?;
        }
        Ok(())
    }
}
