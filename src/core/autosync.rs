//! Periodic background sync scheduling.
//!
//! [`AutoSync`] runs a caller-supplied tick on a background thread at a
//! fixed interval. Stopping is idempotent and joins the worker, so once
//! `stop()` returns no further tick will fire; a tick already in flight is
//! allowed to run to completion.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

pub struct AutoSync {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoSync {
    /// Start ticking `tick` every `interval` on a background thread.
    pub fn start<F>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => tick(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the scheduler and wait for the worker to exit. Safe to call
    /// more than once.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // Worker may already have exited; either way the channel closes
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AutoSync {
    fn drop(&mut self) {
        self.stop();
    }
}
