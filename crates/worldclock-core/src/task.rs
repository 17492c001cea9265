//! A handle to work running on its own thread.
//!
//! Unlike a bare `thread::spawn`, the owner can check for completion,
//! wait with a deadline, or explicitly let the work go.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One value computed on a background thread.
pub struct BackgroundTask<T> {
    rx: Receiver<T>,
    handle: Option<JoinHandle<()>>,
    result: Option<T>,
}

impl<T: Send + 'static> BackgroundTask<T> {
    /// Runs `work` on a new named thread.
    pub fn spawn(name: &str, work: impl FnOnce() -> T + Send + 'static) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _ = tx.send(work());
            })?;
        Ok(Self {
            rx,
            handle: Some(handle),
            result: None,
        })
    }
}

impl<T> BackgroundTask<T> {
    /// Returns `true` once the result is available (or the worker died).
    pub fn is_finished(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }
        match self.rx.try_recv() {
            Ok(value) => {
                self.result = Some(value);
                true
            }
            Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }

    /// Waits up to `timeout` for the result.
    ///
    /// Returns `None` if the work is still running or panicked.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<T> {
        if let Some(value) = self.result.take() {
            self.reap();
            return Some(value);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(value) => {
                self.reap();
                Some(value)
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.reap();
                None
            }
            Err(RecvTimeoutError::Timeout) => None,
        }
    }

    /// Blocks until the work completes.
    ///
    /// Returns `None` if the worker panicked.
    pub fn join(mut self) -> Option<T> {
        let value = self.result.take().or_else(|| self.rx.recv().ok());
        self.reap();
        value
    }

    /// Stops tracking the work and lets it run to completion on its own.
    pub fn abandon(mut self) {
        self.handle.take();
    }

    fn reap(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
