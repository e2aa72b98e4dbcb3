//! Child process plumbing around the interceptor
//!
//! The child's stderr is inherited. Its stdout is read line by line on the
//! calling thread and every emitted line is flushed immediately, so
//! downstream consumers see data at the child's own cadence.
//!
//! An interrupt kills the child from the signal thread. The blocking read
//! then sees end-of-stream, the pending batch is dropped and the bridge
//! reports the interrupt exit code instead of the child's. The flag is
//! checked again once the child has been reaped, so a child that died of
//! the same signal before the flag was set still yields the interrupt code.

use std::io::{BufRead, BufReader, Write};

use log::{debug, info};
use thermofuse_core::constants::INTERRUPT_EXIT_CODE;
use thermofuse_core::{ConfigError, Interrupt, SharedChild, ThermalSource};

use crate::errors::{BridgeError, BridgeResult};
use crate::interceptor::StreamInterceptor;

/// Exit code reported when the child was killed by a signal
pub const SIGNALED_EXIT_CODE: i32 = 1;

/// How a pumped stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// Input reached end-of-stream and the last batch was flushed
    Finished,
    /// Stopped by an interrupt; nothing pending was emitted
    Interrupted,
}

/// Fuses thermal readings into a child's output
pub struct FuseBridge<S: ThermalSource> {
    interceptor: StreamInterceptor<S>,
    interrupt: Interrupt,
}

impl<S: ThermalSource> FuseBridge<S> {
    pub fn new(source: S, interrupt: Interrupt) -> Self {
        Self {
            interceptor: StreamInterceptor::new(source),
            interrupt,
        }
    }

    pub fn interceptor(&self) -> &StreamInterceptor<S> {
        &self.interceptor
    }

    /// Fuse `input` into `output` until end-of-stream or interrupt
    pub fn pump<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
    ) -> BridgeResult<PumpOutcome> {
        let mut buf = Vec::new();
        loop {
            if self.interrupt.is_triggered() {
                return Ok(PumpOutcome::Interrupted);
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            emit(output, self.interceptor.process(&line))?;
        }

        if self.interrupt.is_triggered() {
            return Ok(PumpOutcome::Interrupted);
        }
        emit(output, self.interceptor.finish())?;
        Ok(PumpOutcome::Finished)
    }

    /// Spawn `command`, fuse its output into `output` and return the exit code
    pub fn run<W: Write>(&mut self, command: &[String], output: &mut W) -> BridgeResult<i32> {
        let (program, args) = command
            .split_first()
            .ok_or(ConfigError::EmptyCommand { field: "command" })?;

        let (child, stdout) =
            SharedChild::spawn(program, args).map_err(|source| BridgeError::Spawn {
                program: program.clone(),
                source,
            })?;
        child.kill_on(&self.interrupt);

        let outcome = self.pump(BufReader::new(stdout), output);
        if !matches!(outcome, Ok(PumpOutcome::Finished)) {
            child.kill();
        }
        let status = child.wait();
        self.interrupt.clear_hooks();

        let (outcome, status) = (outcome?, status?);
        debug!("Child exited with {}", status);

        // A terminal Ctrl-C can reach the child before the handler sets the flag.
        if outcome == PumpOutcome::Interrupted || self.interrupt.is_triggered() {
            info!("Interrupted, exiting with {}", INTERRUPT_EXIT_CODE);
            return Ok(INTERRUPT_EXIT_CODE);
        }
        Ok(status.code().unwrap_or(SIGNALED_EXIT_CODE))
    }
}

fn emit<W: Write>(output: &mut W, lines: Vec<String>) -> BridgeResult<()> {
    for line in lines {
        writeln!(output, "{}", line)?;
    }
    output.flush()?;
    Ok(())
}
