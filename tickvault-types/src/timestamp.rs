//! Timestamp representation for serialization.
//!
//! Wall-clock instants are carried as milliseconds since the Unix epoch so
//! that every store adapter and output format agrees on one encoding.

use core::time::Duration;

/// Milliseconds since the Unix epoch.
///
/// Millisecond precision is comfortably finer than the cadences the recorder
/// operates at (whole seconds) while fitting in a `u64` for instants up to
/// ~584 million years out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnixMillis(pub u64);

impl UnixMillis {
    /// Create from milliseconds since the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create from whole seconds since the epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Get the value in milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get the value in whole seconds (truncated).
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1000
    }

    /// The current wall-clock time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }
}

impl From<Duration> for UnixMillis {
    /// Interpret a duration as an offset from the Unix epoch.
    fn from(d: Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

impl From<UnixMillis> for Duration {
    fn from(t: UnixMillis) -> Self {
        Duration::from_millis(t.0)
    }
}
