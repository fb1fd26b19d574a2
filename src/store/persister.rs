//! Write-behind persistence with debouncing
//!
//! Requests inside one quiet window collapse into a single write of the most
//! recent payload. A background thread owns the storage; dropping the
//! persister flushes whatever is still pending before returning.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::storage::DurableStorage;
use crate::error::StorageError;

enum PersistCommand<T> {
    /// Replace the pending payload and restart the quiet window
    Schedule(T),
    /// Write now and acknowledge
    Flush(Sender<()>),
}

/// Debounced, coalescing writer in front of a `DurableStorage`
pub struct DebouncedPersister<T> {
    tx: Option<Sender<PersistCommand<T>>>,
    worker: Option<JoinHandle<()>>,
    advisory: Arc<Mutex<Option<String>>>,
}

impl<T: Serialize + Send + 'static> DebouncedPersister<T> {
    /// Start the persister thread
    pub fn new<S: DurableStorage>(storage: S, delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let advisory = Arc::new(Mutex::new(None));
        let worker_advisory = Arc::clone(&advisory);

        let worker = thread::spawn(move || {
            persister_thread(storage, delay, rx, worker_advisory);
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
            advisory,
        }
    }

    /// Queue `payload`, replacing anything still pending
    pub fn schedule(&self, payload: T) {
        if let Some(tx) = &self.tx {
            if tx.send(PersistCommand::Schedule(payload)).is_err() {
                tracing::warn!("Persister thread is gone; update not scheduled");
            }
        }
    }

    /// Write the pending payload now, bypassing the timer
    ///
    /// Blocks until the write attempt has finished.
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(PersistCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl<T> DebouncedPersister<T> {
    /// Last write failure since the previous call, if any
    pub fn take_advisory(&self) -> Option<String> {
        self.advisory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<T> Drop for DebouncedPersister<T> {
    fn drop(&mut self) {
        // Closing the channel makes the thread flush and exit
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Persister thread panicked during shutdown");
            }
        }
    }
}

/// Persister thread
fn persister_thread<T: Serialize, S: DurableStorage>(
    storage: S,
    delay: Duration,
    rx: Receiver<PersistCommand<T>>,
    advisory: Arc<Mutex<Option<String>>>,
) {
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let command = match deadline {
            Some(at) => match rx.recv_timeout(at.saturating_duration_since(Instant::now())) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        match command {
            Some(PersistCommand::Schedule(payload)) => {
                pending = Some(payload);
                deadline = Some(Instant::now() + delay);
            }
            Some(PersistCommand::Flush(ack)) => {
                write_pending(&storage, &mut pending, &advisory);
                deadline = None;
                let _ = ack.send(());
            }
            None => {
                write_pending(&storage, &mut pending, &advisory);
                deadline = None;
            }
        }
    }

    // Teardown: never drop a pending update
    write_pending(&storage, &mut pending, &advisory);
}

fn write_pending<T: Serialize, S: DurableStorage>(
    storage: &S,
    pending: &mut Option<T>,
    advisory: &Mutex<Option<String>>,
) {
    let Some(payload) = pending.take() else {
        return;
    };

    let result = serde_json::to_string_pretty(&payload)
        .map_err(StorageError::from)
        .and_then(|document| storage.write(&document));

    match result {
        Ok(()) => tracing::debug!("State persisted"),
        Err(e) => {
            // In-memory state stays authoritative; the next update retries
            tracing::warn!("Failed to persist state: {}", e);
            *advisory.lock().unwrap_or_else(PoisonError::into_inner) = Some(e.to_string());
        }
    }
}
