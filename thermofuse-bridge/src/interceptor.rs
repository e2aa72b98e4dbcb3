//! Line-by-line fusion state machine
//!
//! ```text
//!            first line that is not a JSON object
//! Structured ────────────────────────────────────► Text
//!     │                                              │
//!     └─ inject readings, emit one line              └─ batch by key,
//!                                                       flush on repeat
//! ```
//!
//! The switch is one-way. The line that triggers it is handled in text
//! mode straight away.
//!
//! Readings are fetched once per line that contains ':', before the mode
//! is looked at, so every fused line (or flushed cycle) carries values
//! sampled when that line arrived. Blank lines and lines without ':' are
//! emitted unchanged and trigger no fetch.

use log::{debug, info};
use thermofuse_core::{Readings, ThermalSource};

use crate::inject::fuse_record;
use crate::text::{group_key, TextBatch};

/// Current output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Structured,
    Text,
}

/// Owns the mode, the pending text batch and the last fetched readings
pub struct StreamInterceptor<S: ThermalSource> {
    source: S,
    mode: StreamMode,
    batch: TextBatch,
    latest: Readings,
    fetches: usize,
}

impl<S: ThermalSource> StreamInterceptor<S> {
    /// Start in structured mode
    pub fn new(source: S) -> Self {
        Self {
            source,
            mode: StreamMode::Structured,
            batch: TextBatch::new(),
            latest: Readings::new(),
            fetches: 0,
        }
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// Number of fetches so far
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Lines waiting for the next flush
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Process one input line; returns the lines to emit now
    pub fn process(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() || !line.contains(':') {
            return vec![line.to_string()];
        }

        self.latest = self.source.fetch();
        self.fetches += 1;

        if self.mode == StreamMode::Structured {
            if let Some(fused) = fuse_record(line, &self.latest) {
                return vec![fused];
            }
            info!("Output is not structured, switching to text mode");
            self.mode = StreamMode::Text;
        }

        let mut out = Vec::new();
        if group_key(line).is_some_and(|key| self.batch.contains(key)) {
            debug!("Cycle complete, flushing {} lines", self.batch.len());
            out = self.batch.flush(&self.latest);
        }
        self.batch.push(line.to_string());
        out
    }

    /// Flush whatever is pending at end of stream
    ///
    /// Uses the most recent readings; nothing is fetched.
    pub fn finish(&mut self) -> Vec<String> {
        if self.batch.is_empty() {
            return Vec::new();
        }
        debug!("End of stream, flushing {} lines", self.batch.len());
        self.batch.flush(&self.latest)
    }
}
