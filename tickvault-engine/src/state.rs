//! Shared engine state: connectivity belief, counters, overflow queue.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tickvault_types::RecorderStatus;

use crate::queue::OverflowQueue;

/// State shared between the sampler task, the recovery task, and observers.
///
/// The availability flag uses release/acquire ordering so that a transition
/// made by the recovery task is visible to the next sample tick before it
/// decides whether to try the store. Counters only need to be individually
/// consistent and use relaxed ordering.
#[derive(Debug)]
pub(crate) struct EngineState {
    available: AtomicBool,
    total_persisted: AtomicU64,
    pub(crate) queue: OverflowQueue,
    drain_gate: tokio::sync::Mutex<()>,
}

impl EngineState {
    /// Fresh state: store believed available, nothing queued or persisted.
    pub(crate) fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            total_persisted: AtomicU64::new(0),
            queue: OverflowQueue::new(),
            drain_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub(crate) fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    pub(crate) fn mark_available(&self) {
        self.available.store(true, Ordering::Release);
    }

    pub(crate) fn mark_unavailable(&self) {
        self.available.store(false, Ordering::Release);
    }

    pub(crate) fn record_persisted(&self) {
        self.total_persisted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn total_persisted(&self) -> u64 {
        self.total_persisted.load(Ordering::Relaxed)
    }

    /// Claim the exclusive right to drain, or `None` if a drain is already
    /// in progress somewhere else.
    pub(crate) fn try_drain_gate(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        self.drain_gate.try_lock().ok()
    }

    pub(crate) fn status(&self) -> RecorderStatus {
        RecorderStatus::stamped(
            self.is_available(),
            self.queue.len() as u64,
            self.total_persisted(),
        )
    }
}
