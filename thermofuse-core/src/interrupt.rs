//! Process interrupt flag
//!
//! SIGINT/SIGTERM land on a handler thread owned by `ctrlc`. The handler
//! only sets a flag and runs registered hooks (typically: kill the child
//! whose output the main thread is blocked on). The main thread then sees
//! end-of-stream, checks the flag and takes the shutdown path itself, so
//! all cleanup runs on the thread that owns the hardware handles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

type Hook = Box<dyn Fn() + Send>;

/// Shared interrupt flag with trigger hooks
#[derive(Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
    hooks: Arc<Mutex<Vec<Hook>>>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route SIGINT and SIGTERM to [`Interrupt::trigger`]
    ///
    /// Can only succeed once per process.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupt received, shutting down");
            handle.trigger();
        })
    }

    /// Set the flag and run every hook
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        match self.hooks.lock() {
            Ok(hooks) => hooks.iter().for_each(|hook| hook()),
            Err(_) => warn!("Interrupt hooks unavailable"),
        }
    }

    /// True once triggered
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Register a hook; runs immediately if already triggered
    pub fn on_trigger(&self, hook: impl Fn() + Send + 'static) {
        if self.is_triggered() {
            debug!("Interrupt already triggered, running hook now");
            hook();
        }
        if let Ok(mut hooks) = self.hooks.lock() {
            hooks.push(Box::new(hook));
        }
    }

    /// Drop every registered hook
    pub fn clear_hooks(&self) {
        if let Ok(mut hooks) = self.hooks.lock() {
            hooks.clear();
        }
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}
