//! Shared fixtures for thermofuse-bridge integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use thermofuse_core::{Readings, ThermalSource};

/// Readings that step by a fixed amount on every fetch
///
/// Clones share the fetch counter.
#[derive(Clone)]
pub struct SteppingSource {
    keys: Vec<(&'static str, f64)>,
    step: f64,
    fetches: Rc<Cell<usize>>,
}

impl SteppingSource {
    pub fn new(keys: &[(&'static str, f64)], step: f64) -> Self {
        Self {
            keys: keys.to_vec(),
            step,
            fetches: Rc::new(Cell::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl ThermalSource for SteppingSource {
    fn fetch(&mut self) -> Readings {
        let n = self.fetches.get();
        self.fetches.set(n + 1);
        self.keys
            .iter()
            .map(|(k, base)| (*k, base + self.step * n as f64))
            .collect()
    }
}

/// `sh -c <script>` as an argument vector
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}
