//! Tick bodies for the two periodic activities and the shared drain.
//!
//! Each function is one full run of its activity. The scheduler in
//! `recorder` only decides *when* these run; everything about *what* a tick
//! does - including every state transition - lives here.

use tickvault_store::TickStore;
use tickvault_types::Sample;
use tracing::{debug, error, info, warn};

use crate::state::EngineState;

/// One sampler tick: observe the clock, persist or queue the sample.
pub(crate) async fn sample_tick(state: &EngineState, store: &dyn TickStore) {
    let sample = Sample::now();

    if !state.is_available() {
        // fail fast while the store is down; the recovery probe owns retries
        state.queue.append(sample);
        debug!(pending = state.queue.len(), "store down, sample queued");
        return;
    }

    match store.save(sample).await {
        Ok(ack) => {
            state.record_persisted();
            debug!(id = ack.id, "sample persisted");
            // leftovers from an outage may still be queued
            drain_pending(state, store).await;
        }
        Err(err) if err.is_transient() => {
            warn!(error = %err, "store connection lost, queueing sample");
            state.mark_unavailable();
            state.queue.append(sample);
        }
        Err(err) => {
            // not a connectivity problem; losing one tick beats wedging the
            // scheduler on a sample that can never be written
            error!(error = %err, "non-recoverable save error, sample dropped");
        }
    }
}

/// One recovery tick: no-op while available, otherwise probe and drain.
pub(crate) async fn recovery_tick(state: &EngineState, store: &dyn TickStore) {
    if state.is_available() {
        return;
    }

    match store.probe().await {
        Ok(()) => {
            info!(pending = state.queue.len(), "store connection restored");
            state.mark_available();
            drain_pending(state, store).await;
        }
        Err(err) => {
            debug!(error = %err, "store still unreachable");
        }
    }
}

/// Flush queued samples oldest-first, stopping at the first failure.
///
/// At most one drain runs at a time: a caller that finds a drain already in
/// progress skips instead of piling up behind it. On failure the popped
/// sample goes back to the head of the queue and the store is marked
/// unavailable, so nothing is ever skipped past a failing sample.
pub(crate) async fn drain_pending(state: &EngineState, store: &dyn TickStore) {
    let Some(_gate) = state.try_drain_gate() else {
        return;
    };

    let mut drained = 0usize;
    while state.is_available() {
        let Some(sample) = state.queue.pop_front() else {
            break;
        };

        match store.save(sample).await {
            Ok(_) => {
                state.record_persisted();
                drained += 1;
            }
            Err(err) => {
                state.queue.push_front(sample);
                state.mark_unavailable();
                warn!(
                    error = %err,
                    drained,
                    pending = state.queue.len(),
                    "store lost mid-drain"
                );
                break;
            }
        }
    }

    if drained > 0 {
        info!(drained, pending = state.queue.len(), "flushed queued samples");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tickvault_store::{MemoryStore, SaveAck, StoreError, StoredSample};
    use tickvault_types::UnixMillis;

    fn sample(millis: u64) -> Sample {
        Sample::at(UnixMillis::from_millis(millis))
    }

    #[tokio::test]
    async fn sample_tick_persists_while_store_is_up() {
        let state = EngineState::new();
        let store = MemoryStore::new();

        sample_tick(&state, &store).await;

        assert_eq!(state.total_persisted(), 1);
        assert!(state.queue.is_empty());
        assert!(state.is_available());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn sample_tick_queues_without_trying_a_known_down_store() {
        let state = EngineState::new();
        state.mark_unavailable();
        let store = MemoryStore::offline();

        sample_tick(&state, &store).await;
        sample_tick(&state, &store).await;

        assert_eq!(state.queue.len(), 2);
        assert_eq!(store.save_attempts(), 0);
        assert_eq!(state.total_persisted(), 0);
    }

    #[tokio::test]
    async fn save_failure_flips_state_and_keeps_the_sample() {
        let state = EngineState::new();
        let store = MemoryStore::offline();

        sample_tick(&state, &store).await;

        assert!(!state.is_available());
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.total_persisted(), 0);
        assert_eq!(store.save_attempts(), 1);
    }

    #[tokio::test]
    async fn successful_save_drains_outage_leftovers() {
        let state = EngineState::new();
        let store = MemoryStore::new();
        state.queue.append(sample(1));
        state.queue.append(sample(2));

        sample_tick(&state, &store).await;

        // the live sample plus both leftovers
        assert_eq!(state.total_persisted(), 3);
        assert!(state.queue.is_empty());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn recovery_tick_is_a_no_op_while_available() {
        let state = EngineState::new();
        let store = MemoryStore::new();

        recovery_tick(&state, &store).await;

        assert_eq!(store.probe_attempts(), 0);
        assert!(state.is_available());
    }

    #[tokio::test]
    async fn failed_probe_leaves_the_state_down() {
        let state = EngineState::new();
        state.mark_unavailable();
        let store = MemoryStore::offline();
        state.queue.append(sample(1));

        recovery_tick(&state, &store).await;

        assert!(!state.is_available());
        assert_eq!(state.queue.len(), 1);
        assert_eq!(store.probe_attempts(), 1);
    }

    #[tokio::test]
    async fn successful_probe_drains_the_queue_in_order() {
        let state = EngineState::new();
        state.mark_unavailable();
        let store = MemoryStore::new();
        state.queue.append(sample(10));
        state.queue.append(sample(20));
        state.queue.append(sample(30));

        recovery_tick(&state, &store).await;

        assert!(state.is_available());
        assert!(state.queue.is_empty());
        assert_eq!(state.total_persisted(), 3);

        // persistence order matches production order, ids strictly increase
        let saved = store.saved();
        let instants: Vec<u64> = saved.iter().map(|r| r.recorded_at.as_millis()).collect();
        assert_eq!(instants, vec![10, 20, 30]);
        let ids: Vec<u64> = saved.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn drain_stops_at_the_first_failure_and_requeues_it() {
        let state = EngineState::new();
        let store = MemoryStore::new();
        state.queue.append(sample(10));
        state.queue.append(sample(20));
        state.queue.append(sample(30));
        store.fail_next_saves(1);

        drain_pending(&state, &store).await;

        // the head failed, nothing was skipped past it
        assert!(!state.is_available());
        assert_eq!(state.queue.len(), 3);
        assert_eq!(state.total_persisted(), 0);
        assert_eq!(store.save_attempts(), 1);

        // a later drain picks up exactly where the failed one stopped
        state.mark_available();
        drain_pending(&state, &store).await;

        assert!(state.queue.is_empty());
        assert_eq!(state.total_persisted(), 3);
        let instants: Vec<u64> = store
            .saved()
            .iter()
            .map(|r| r.recorded_at.as_millis())
            .collect();
        assert_eq!(instants, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn drain_mid_queue_failure_keeps_the_remainder_ordered() {
        let state = EngineState::new();
        let store = MemoryStore::new();
        state.queue.append(sample(10));
        state.queue.append(sample(20));
        state.queue.append(sample(30));

        // the head drains, then the store goes away
        let first = state.queue.pop_front().unwrap();
        store.save(first).await.unwrap();
        state.record_persisted();
        store.fail_next_saves(1);

        drain_pending(&state, &store).await;

        assert!(!state.is_available());
        assert_eq!(state.total_persisted(), 1);
        assert_eq!(state.queue.len(), 2);
        assert_eq!(
            state.queue.pop_front(),
            Some(sample(20)),
            "failed sample stays at the head"
        );
    }

    #[tokio::test]
    async fn drain_of_an_empty_queue_does_nothing() {
        let state = EngineState::new();
        let store = MemoryStore::new();

        drain_pending(&state, &store).await;

        assert_eq!(store.save_attempts(), 0);
        assert_eq!(state.total_persisted(), 0);
    }

    /// Store whose failures are data faults, not outages.
    struct PoisonedStore;

    #[async_trait]
    impl TickStore for PoisonedStore {
        async fn save(&self, _sample: Sample) -> Result<SaveAck, StoreError> {
            Err(StoreError::Serialize("unencodable sample".to_string()))
        }

        async fn probe(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<StoredSample>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn non_transient_save_error_drops_the_tick_only() {
        let state = EngineState::new();
        let store = PoisonedStore;

        sample_tick(&state, &store).await;

        // the sample is gone, but the scheduler state is untouched
        assert!(state.is_available());
        assert!(state.queue.is_empty());
        assert_eq!(state.total_persisted(), 0);
    }
}
