//! The overflow queue bridging store outages.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tickvault_types::Sample;

/// Unbounded FIFO buffer of samples awaiting persistence.
///
/// The sampler appends at the tail while a drain pops from the head; both
/// sides go through one mutex, so the relative order of queued samples never
/// changes. A drain that fails puts the popped sample back at the head,
/// keeping it first in line for the next attempt.
#[derive(Debug, Default)]
pub(crate) struct OverflowQueue {
    samples: Mutex<VecDeque<Sample>>,
}

impl OverflowQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a sample at the tail. Never fails; the queue is unbounded.
    pub(crate) fn append(&self, sample: Sample) {
        self.samples.lock().push_back(sample);
    }

    /// Remove and return the oldest queued sample.
    pub(crate) fn pop_front(&self) -> Option<Sample> {
        self.samples.lock().pop_front()
    }

    /// Put a sample back at the head after a failed persist.
    pub(crate) fn push_front(&self, sample: Sample) {
        self.samples.lock().push_front(sample);
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }
}
