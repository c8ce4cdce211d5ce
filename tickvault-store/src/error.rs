//! Error types for store adapters.

use thiserror::Error;

/// Errors surfaced by store adapters.
///
/// The recording engine distinguishes exactly two classes: transient
/// connectivity failures (the store is unreachable, the sample must survive
/// in the overflow queue until the store returns) and data faults (the
/// payload or the stored bytes are wrong, retrying cannot help).
/// [`StoreError::is_transient`] encodes that split.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The store did not answer in time.
    #[error("store request timed out")]
    Timeout,

    /// Reading or writing the backing medium failed.
    #[error("store I/O failed: {0}")]
    Io(String),

    /// The remote store answered with a non-success status.
    #[cfg(feature = "http")]
    #[error("store HTTP request failed: {0}")]
    Http(String),

    /// Stored bytes could not be decoded.
    #[error("failed to parse stored record: {0}")]
    Parse(String),

    /// The sample could not be encoded for storage.
    #[error("failed to encode sample: {0}")]
    Serialize(String),
}

impl StoreError {
    /// Whether this failure is a connectivity outage a later retry can
    /// recover from.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Connection(_) | StoreError::Timeout | StoreError::Io(_) => true,
            #[cfg(feature = "http")]
            StoreError::Http(_) => true,
            StoreError::Parse(_) | StoreError::Serialize(_) => false,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_connect() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Http(err.to_string())
        }
    }
}
