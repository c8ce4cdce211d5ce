//! Recorder status snapshot.

use crate::UnixMillis;

/// A point-in-time view of the recorder, safe to read at any moment.
///
/// This is the shape a status surface serializes: the recorder's current
/// belief about store connectivity, the overflow queue depth, and the
/// monotonic persisted-total, stamped with the instant the snapshot was
/// taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecorderStatus {
    /// Whether the store currently accepts writes, as far as the recorder
    /// knows.
    pub store_available: bool,
    /// Samples parked in the overflow queue, awaiting persistence.
    pub pending_samples: u64,
    /// Samples durably persisted since start. Never decreases.
    pub total_persisted: u64,
    /// When this snapshot was taken.
    pub timestamp_ms: UnixMillis,
}

impl RecorderStatus {
    /// Build a status snapshot stamped with the current wall-clock time.
    #[cfg(feature = "std")]
    pub fn stamped(store_available: bool, pending_samples: u64, total_persisted: u64) -> Self {
        Self {
            store_available,
            pending_samples,
            total_persisted,
            timestamp_ms: UnixMillis::now(),
        }
    }
}
