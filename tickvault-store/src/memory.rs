//! In-memory store with a controllable online/offline switch.
//!
//! Behaves like a real store, including outages on demand, which makes it
//! the store of choice for tests and local development: flip it offline to
//! simulate a connection loss, flip it back to let the recorder recover.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tickvault_types::{Sample, SaveAck, StoredSample, UnixMillis};

use crate::{StoreError, TickStore};

/// An in-process [`TickStore`] backed by a `Vec`.
#[derive(Debug)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredSample>>,
    next_id: AtomicU64,
    online: AtomicBool,
    fail_budget: AtomicU64,
    save_attempts: AtomicU64,
    probe_attempts: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store in the online state.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            online: AtomicBool::new(true),
            fail_budget: AtomicU64::new(0),
            save_attempts: AtomicU64::new(0),
            probe_attempts: AtomicU64::new(0),
        }
    }

    /// Create an empty store that starts offline.
    pub fn offline() -> Self {
        let store = Self::new();
        store.online.store(false, Ordering::SeqCst);
        store
    }

    /// Flip store reachability. An offline store fails saves, probes and
    /// listings with a transient connection error.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Whether the store currently accepts calls.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Make the next `n` saves fail with a transient connection error even
    /// while the store is online.
    pub fn fail_next_saves(&self, n: u64) {
        self.fail_budget.store(n, Ordering::SeqCst);
    }

    /// Number of save calls attempted so far, including failed ones.
    pub fn save_attempts(&self) -> u64 {
        self.save_attempts.load(Ordering::SeqCst)
    }

    /// Number of probe calls attempted so far, including failed ones.
    pub fn probe_attempts(&self) -> u64 {
        self.probe_attempts.load(Ordering::SeqCst)
    }

    /// Snapshot of everything persisted so far, in persistence order.
    pub fn saved(&self) -> Vec<StoredSample> {
        self.records.lock().clone()
    }

    /// Number of persisted samples.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been persisted yet.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.is_online() {
            Ok(())
        } else {
            Err(StoreError::Connection("store is offline".to_string()))
        }
    }

    fn take_injected_failure(&self) -> Result<(), StoreError> {
        let mut budget = self.fail_budget.load(Ordering::SeqCst);
        while budget > 0 {
            match self.fail_budget.compare_exchange(
                budget,
                budget - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Err(StoreError::Connection("injected save failure".to_string())),
                Err(actual) => budget = actual,
            }
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TickStore for MemoryStore {
    async fn save(&self, sample: Sample) -> Result<SaveAck, StoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.take_injected_failure()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let ack = SaveAck {
            id,
            persisted_at: UnixMillis::now(),
        };
        self.records.lock().push(StoredSample {
            id,
            recorded_at: sample.recorded_at,
            persisted_at: ack.persisted_at,
        });
        Ok(ack)
    }

    async fn probe(&self) -> Result<(), StoreError> {
        self.probe_attempts.fetch_add(1, Ordering::SeqCst);
        self.check_online()
    }

    async fn list_all(&self) -> Result<Vec<StoredSample>, StoreError> {
        self.check_online()?;
        let mut records = self.records.lock().clone();
        records.sort_by_key(|r| r.recorded_at);
        Ok(records)
    }
}
