//! Write-behind persistence.
//!
//! Saves are recorded in an in-memory cache and handed to a worker thread
//! over an unbounded channel, so the input loop never waits on disk. Loads
//! are answered from the cache, which starts as a snapshot of the wrapped
//! port. Dropping the store closes the channel and joins the worker after it
//! has written everything queued. Saves the worker could not complete are
//! counted in a [`WriteFailures`] handle that outlives the store.

use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use calc_core::persistence::PersistencePort;
use calc_core::{CalcError, CalcResult};
use flume::Sender;
use tracing::{debug, warn};

struct PendingWrite {
    key: String,
    value: String,
}

/// Shared count of saves the worker could not complete
#[derive(Debug, Clone, Default)]
pub struct WriteFailures(Arc<AtomicU64>);

impl WriteFailures {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct WriteBehindStore {
    cache: BTreeMap<String, String>,
    sender: Option<Sender<PendingWrite>>,
    worker: Option<JoinHandle<()>>,
    failures: WriteFailures,
}

impl WriteBehindStore {
    /// Snapshot `keys` from `inner`, then move `inner` onto a worker thread.
    pub fn spawn<P>(inner: P, keys: &[&str]) -> io::Result<Self>
    where
        P: PersistencePort + 'static,
    {
        let mut cache = BTreeMap::new();
        for key in keys {
            match inner.load(key) {
                Ok(Some(value)) => {
                    cache.insert(key.to_string(), value);
                }
                Ok(None) => {}
                Err(e) => warn!(key, error = %e, "snapshot read failed"),
            }
        }

        let (sender, receiver) = flume::unbounded::<PendingWrite>();
        let failures = WriteFailures::default();
        let worker_failures = failures.clone();

        let worker = thread::Builder::new()
            .name("calci-store".to_string())
            .spawn(move || {
                let mut inner = inner;
                // Ends once every sender is dropped and the queue is empty
                for write in receiver.iter() {
                    if let Err(e) = inner.save(&write.key, &write.value) {
                        worker_failures.record();
                        warn!(key = %write.key, error = %e, "background save failed");
                    }
                }
                debug!("store worker drained");
            })?;

        Ok(WriteBehindStore {
            cache,
            sender: Some(sender),
            worker: Some(worker),
            failures,
        })
    }

    /// Handle on the failure count, readable after the store is dropped
    pub fn failures(&self) -> WriteFailures {
        self.failures.clone()
    }
}

impl PersistencePort for WriteBehindStore {
    fn load(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.cache.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> CalcResult<()> {
        self.cache.insert(key.to_string(), value.to_string());
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| CalcError::internal("store already shut down"))?;
        sender
            .send(PendingWrite {
                key: key.to_string(),
                value: value.to_string(),
            })
            .map_err(|_| CalcError::internal("store worker stopped"))
    }
}

impl Drop for WriteBehindStore {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("store worker panicked");
            }
        }
    }
}
