//! The store contract consumed by the recording engine.

use std::sync::Arc;

use async_trait::async_trait;
use tickvault_types::{Sample, SaveAck, StoredSample};

use crate::StoreError;

/// An ordered, durable sample store.
///
/// Implementations must be safe for concurrent independent calls; the
/// recording engine never issues concurrent saves for the same queued
/// sample, but a live sampler save may overlap a drain of older samples.
#[async_trait]
pub trait TickStore: Send + Sync {
    /// Durably persist one sample.
    ///
    /// The returned ack carries the store-assigned sequence id (strictly
    /// increasing per store) and the durable-write timestamp.
    async fn save(&self, sample: Sample) -> Result<SaveAck, StoreError>;

    /// Cheap liveness check with no effect on stored data.
    async fn probe(&self) -> Result<(), StoreError>;

    /// All persisted samples, ordered by recording instant ascending.
    async fn list_all(&self) -> Result<Vec<StoredSample>, StoreError>;
}

#[async_trait]
impl<S> TickStore for Arc<S>
where
    S: TickStore + ?Sized,
{
    async fn save(&self, sample: Sample) -> Result<SaveAck, StoreError> {
        (**self).save(sample).await
    }

    async fn probe(&self) -> Result<(), StoreError> {
        (**self).probe().await
    }

    async fn list_all(&self) -> Result<Vec<StoredSample>, StoreError> {
        (**self).list_all().await
    }
}
