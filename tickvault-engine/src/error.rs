//! Errors exposed at the query boundary.

use thiserror::Error;
use tickvault_store::StoreError;

/// Failure of a record listing at the caller-facing boundary.
///
/// A store outage surfaces as an explicit offline signal carrying the
/// current queue depth; callers are expected to report service-unavailable
/// and come back later, not retry internally.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The store is currently unreachable; samples are queueing in memory.
    #[error("store is currently unavailable ({pending} samples queued)")]
    StoreOffline {
        /// Overflow queue depth at the time of the query.
        pending: usize,
    },

    /// The store failed while serving the listing.
    #[error("failed to read records from the store")]
    QueryFailed(#[source] StoreError),
}
