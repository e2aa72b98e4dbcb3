//! Child process handle shared with the interrupt thread
//!
//! The reading thread owns the child's stdout; the child itself sits
//! behind a mutex so an interrupt hook can kill it while the reader is
//! blocked. Waiting polls `try_wait` so the lock is never held across a
//! blocking call.

use std::io;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::interrupt::Interrupt;

const WAIT_POLL: Duration = Duration::from_millis(10);

/// A spawned child whose stdout is read by the caller
#[derive(Debug, Clone)]
pub struct SharedChild {
    child: Arc<Mutex<Child>>,
    id: u32,
}

impl SharedChild {
    /// Spawn `program args..` with piped stdout and inherited stderr
    pub fn spawn(program: &str, args: &[String]) -> io::Result<(Self, ChildStdout)> {
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdout not captured"))?;
        let id = child.id();
        info!("Started '{} {}' (pid {})", program, args.join(" "), id);
        Ok((
            Self {
                child: Arc::new(Mutex::new(child)),
                id,
            },
            stdout,
        ))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Kill the child when `interrupt` fires
    pub fn kill_on(&self, interrupt: &Interrupt) {
        let handle = self.clone();
        interrupt.on_trigger(move || handle.kill());
    }

    /// Kill the child; a child that already exited is not an error
    pub fn kill(&self) {
        if let Err(e) = self.lock().kill() {
            debug!("Kill of pid {} failed: {}", self.id, e);
        }
    }

    /// Wait for exit without holding the lock across the wait
    pub fn wait(&self) -> io::Result<ExitStatus> {
        loop {
            if let Some(status) = self.lock().try_wait()? {
                debug!("pid {} exited with {}", self.id, status);
                return Ok(status);
            }
            thread::sleep(WAIT_POLL);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Child> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn output_and_status() {
        let (child, mut stdout) = SharedChild::spawn("sh", &sh("echo hi; exit 4")).unwrap();
        let mut out = String::new();
        stdout.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hi\n");
        assert_eq!(child.wait().unwrap().code(), Some(4));
    }

    #[test]
    fn interrupt_kills_child() {
        let (child, mut stdout) = SharedChild::spawn("sh", &sh("exec sleep 30")).unwrap();
        let interrupt = Interrupt::new();
        child.kill_on(&interrupt);
        interrupt.trigger();

        let mut out = String::new();
        stdout.read_to_string(&mut out).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), None);
    }

    #[test]
    fn missing_program() {
        assert!(SharedChild::spawn("thermofuse-no-such-program", &[]).is_err());
    }
}
