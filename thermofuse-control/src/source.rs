//! Row stream read from a data source process
//!
//! The monitor runs its data source (normally `thermo-fuse` in structured
//! mode) as a child and parses each stdout line into a [`Row`]. Blank lines
//! are skipped. The child is killed when the stream is dropped, so an early
//! stop never leaves it running.

use std::io::{BufRead, BufReader};
use std::process::ChildStdout;

use log::{debug, warn};
use thermofuse_core::parser::parse_line;
use thermofuse_core::{Interrupt, Row, SharedChild};

use crate::errors::{ControlError, ControlResult};

/// Iterator over the rows a child process prints
pub struct ChildRows {
    child: SharedChild,
    lines: std::io::Lines<BufReader<ChildStdout>>,
    interrupt: Interrupt,
    rows: usize,
    finished: bool,
}

impl ChildRows {
    /// Spawn `command[0] command[1..]`
    pub fn spawn(command: &[String], interrupt: &Interrupt) -> ControlResult<Self> {
        let (program, args) = command.split_first().ok_or_else(|| ControlError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;
        let (child, stdout) = SharedChild::spawn(program, args).map_err(|source| ControlError::Spawn {
            program: program.clone(),
            source,
        })?;
        child.kill_on(interrupt);

        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
            interrupt: interrupt.clone(),
            rows: 0,
            finished: false,
        })
    }

    /// Rows yielded so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn finish(&mut self) -> Option<ControlResult<Row>> {
        self.finished = true;
        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => return Some(Err(e.into())),
        };
        if status.success() || self.interrupt.is_triggered() {
            return None;
        }
        if self.rows == 0 {
            return Some(Err(ControlError::SourceFailed { status }));
        }
        warn!("Data source exited with {}", status);
        None
    }
}

impl Iterator for ChildRows {
    type Item = ControlResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.lines.next() {
                None => return self.finish(),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => {
                    let row = parse_line(&line).map_err(ControlError::from);
                    if row.is_ok() {
                        self.rows += 1;
                    } else {
                        debug!("Unparseable line: {}", line);
                    }
                    return Some(row);
                }
            }
        }
    }
}

impl Drop for ChildRows {
    fn drop(&mut self) {
        self.child.kill();
        if let Err(e) = self.child.wait() {
            debug!("Reaping pid {} failed: {}", self.child.id(), e);
        }
    }
}
