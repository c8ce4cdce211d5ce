//! Sample types - the unit of recording.

use crate::UnixMillis;

/// One wall-clock observation produced by the periodic sampler.
///
/// A sample carries no identity of its own: identity is assigned by the
/// store at the moment of durable write (see [`SaveAck`]). Until then the
/// sample is just its recording instant, which is assigned once at creation
/// and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// When the sampler observed the clock.
    pub recorded_at: UnixMillis,
}

impl Sample {
    /// Create a sample for a specific instant.
    pub const fn at(recorded_at: UnixMillis) -> Self {
        Self { recorded_at }
    }

    /// Create a sample for the current wall-clock time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        Self {
            recorded_at: UnixMillis::now(),
        }
    }
}

/// Store acknowledgement of a durable write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaveAck {
    /// Store-assigned sequence id, strictly increasing per store.
    pub id: u64,
    /// Store-assigned instant of the durable write.
    pub persisted_at: UnixMillis,
}

/// A durably persisted sample, as returned by store listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoredSample {
    /// Store-assigned sequence id.
    pub id: u64,
    /// When the sampler observed the clock.
    pub recorded_at: UnixMillis,
    /// When the store durably wrote the sample.
    pub persisted_at: UnixMillis,
}
