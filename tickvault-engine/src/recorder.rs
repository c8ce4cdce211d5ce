//! Recorder lifecycle: builder, background tasks, control handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tickvault_store::TickStore;
use tickvault_types::{RecorderStatus, StoredSample};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::RecorderConfig;
use crate::error::QueryError;
use crate::state::EngineState;
use crate::ticks;

/// A configured recorder, ready to start.
///
/// Built through [`Recorder::builder`]; [`Recorder::start`] spawns the two
/// background activities (sampling and recovery probing) and hands back the
/// [`RecorderHandle`] used to observe and stop them.
pub struct Recorder {
    store: Arc<dyn TickStore>,
    config: RecorderConfig,
}

impl Recorder {
    /// Create a builder for configuring the recorder.
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::default()
    }

    /// Spawn the sampler and recovery tasks and hand back the control
    /// handle.
    ///
    /// The sampler takes its first sample immediately and then every
    /// recording interval; the recovery probe first fires one full recovery
    /// interval after start. Each activity is serialized against itself: a
    /// tick that would overlap a still-running one is skipped.
    pub fn start(self) -> RecorderHandle {
        let state = Arc::new(EngineState::new());
        let (stop_tx, stop_rx) = watch::channel(false);

        let sampler = {
            let state = state.clone();
            let store = self.store.clone();
            let mut stop_rx = stop_rx.clone();
            let interval = self.config.recording_interval;
            tokio::spawn(async move {
                let mut ticker = time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => ticks::sample_tick(&state, store.as_ref()).await,
                        changed = stop_rx.changed() => {
                            if changed.is_err() || *stop_rx.borrow() {
                                break;
                            }
                        }
                    }
                }
            })
        };

        let recovery = {
            let state = state.clone();
            let store = self.store.clone();
            let mut stop_rx = stop_rx;
            let interval = self.config.recovery_interval;
            tokio::spawn(async move {
                let start = time::Instant::now() + interval;
                let mut ticker = time::interval_at(start, interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => ticks::recovery_tick(&state, store.as_ref()).await,
                        changed = stop_rx.changed() => {
                            if changed.is_err() || *stop_rx.borrow() {
                                break;
                            }
                        }
                    }
                }
            })
        };

        info!(
            interval_secs = self.config.recording_interval.as_secs_f64(),
            recovery_secs = self.config.recovery_interval.as_secs_f64(),
            "time recording started"
        );

        RecorderHandle {
            state,
            store: self.store,
            config: self.config,
            stop_tx,
            tasks: Mutex::new(Some([sampler, recovery])),
            degraded: AtomicBool::new(false),
        }
    }
}

/// Builder for configuring a [`Recorder`].
#[derive(Debug, Default)]
pub struct RecorderBuilder {
    config: RecorderConfig,
}

impl RecorderBuilder {
    /// Replace the whole timing configuration at once.
    pub fn config(mut self, config: RecorderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the sampling cadence. Defaults to 1 second.
    pub fn recording_interval(mut self, interval: Duration) -> Self {
        self.config.recording_interval = interval;
        self
    }

    /// Set the recovery-probe cadence. Defaults to 5 seconds.
    pub fn recovery_interval(mut self, interval: Duration) -> Self {
        self.config.recovery_interval = interval;
        self
    }

    /// Set the default shutdown grace period. Defaults to 10 seconds.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Build the recorder against a store.
    pub fn build<S>(self, store: S) -> Recorder
    where
        S: TickStore + 'static,
    {
        Recorder {
            store: Arc::new(store),
            config: self.config,
        }
    }
}

/// Final counters returned by [`RecorderHandle::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Samples durably persisted over the recorder's lifetime.
    pub total_persisted: u64,
    /// Samples still in the overflow queue. These were never persisted;
    /// they are reported here rather than silently discarded.
    pub pending_samples: u64,
    /// False when in-flight work had to be cancelled past the timeout.
    pub clean: bool,
}

/// Control handle for a running recorder.
///
/// Observers ([`is_available`](Self::is_available),
/// [`pending_count`](Self::pending_count),
/// [`total_persisted`](Self::total_persisted), [`status`](Self::status))
/// never fail and can be called from any task at any time.
pub struct RecorderHandle {
    state: Arc<EngineState>,
    store: Arc<dyn TickStore>,
    config: RecorderConfig,
    stop_tx: watch::Sender<bool>,
    tasks: Mutex<Option<[JoinHandle<()>; 2]>>,
    degraded: AtomicBool,
}

impl RecorderHandle {
    /// The recorder's current belief about store connectivity.
    pub fn is_available(&self) -> bool {
        self.state.is_available()
    }

    /// Samples parked in the overflow queue.
    pub fn pending_count(&self) -> usize {
        self.state.queue.len()
    }

    /// Samples durably persisted since start.
    pub fn total_persisted(&self) -> u64 {
        self.state.total_persisted()
    }

    /// Point-in-time status snapshot.
    pub fn status(&self) -> RecorderStatus {
        self.state.status()
    }

    /// The timing configuration the recorder runs with.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// All persisted samples, oldest recording first.
    ///
    /// Fails fast with [`QueryError::StoreOffline`] while the store is down
    /// instead of retrying internally. A store failure during the listing
    /// flips the connectivity state, so the next sample tick queues rather
    /// than hitting the dead store again.
    pub async fn all_records(&self) -> Result<Vec<StoredSample>, QueryError> {
        if !self.state.is_available() {
            return Err(QueryError::StoreOffline {
                pending: self.state.queue.len(),
            });
        }

        match self.store.list_all().await {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(error = %err, "record listing failed, marking store unavailable");
                self.state.mark_unavailable();
                Err(QueryError::QueryFailed(err))
            }
        }
    }

    /// Stop the recorder: no new ticks, bounded wait for in-flight work.
    ///
    /// Waits up to `timeout` for the two background tasks to finish their
    /// current tick, then aborts them and allows a short fixed grace window
    /// for the cancellation to land. The returned report carries the final
    /// counters; `clean` is false when the deadline was exceeded.
    ///
    /// Idempotent: a second call finds no tasks and returns the same
    /// counters immediately.
    pub async fn shutdown(&self, timeout: Duration) -> ShutdownReport {
        const FORCE_GRACE: Duration = Duration::from_secs(3);

        let tasks = self.tasks.lock().take();
        let Some(tasks) = tasks else {
            return self.report();
        };

        info!("stopping time recording");
        let _ = self.stop_tx.send(true);

        let deadline = time::Instant::now() + timeout;
        for mut task in tasks {
            let remaining = deadline.saturating_duration_since(time::Instant::now());
            if time::timeout(remaining, &mut task).await.is_err() {
                warn!("background task exceeded the shutdown timeout, cancelling");
                task.abort();
                if time::timeout(FORCE_GRACE, &mut task).await.is_err() {
                    warn!("background task survived forced cancellation");
                }
                self.degraded.store(true, Ordering::Relaxed);
            }
        }

        let report = self.report();
        info!(
            total_persisted = report.total_persisted,
            pending = report.pending_samples,
            clean = report.clean,
            "time recording stopped"
        );
        report
    }

    fn report(&self) -> ShutdownReport {
        ShutdownReport {
            total_persisted: self.state.total_persisted(),
            pending_samples: self.state.queue.len() as u64,
            clean: !self.degraded.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickvault_store::MemoryStore;

    fn quick_recorder(store: Arc<MemoryStore>) -> Recorder {
        Recorder::builder()
            .recording_interval(Duration::from_secs(1))
            .recovery_interval(Duration::from_secs(60))
            .build(store)
    }

    #[tokio::test(start_paused = true)]
    async fn persists_one_sample_per_tick_while_store_is_up() {
        let store = Arc::new(MemoryStore::new());
        let handle = quick_recorder(store.clone()).start();

        // ticks land at 0s, 1s and 2s
        time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(handle.total_persisted(), 3);
        assert_eq!(handle.pending_count(), 0);
        assert!(handle.is_available());
        assert_eq!(store.len(), 3);

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn queues_everything_during_a_permanent_outage() {
        let store = Arc::new(MemoryStore::offline());
        let handle = quick_recorder(store.clone()).start();

        // five ticks: 0s through 4s; the recovery probe (60s) never fires
        time::sleep(Duration::from_millis(4500)).await;

        assert_eq!(handle.pending_count(), 5);
        assert_eq!(handle.total_persisted(), 0);
        assert!(!handle.is_available());
        // only the first tick touched the store; the rest failed fast
        assert_eq!(store.save_attempts(), 1);

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn recovery_probe_drains_an_ended_outage() {
        let store = Arc::new(MemoryStore::offline());
        let handle = Recorder::builder()
            .recording_interval(Duration::from_secs(1))
            .recovery_interval(Duration::from_millis(2500))
            .build(store.clone())
            .start();

        // ticks at 0s and 1s fail and queue; the store heals at 1.5s
        time::sleep(Duration::from_millis(1500)).await;
        store.set_online(true);

        // the 2s tick still queues (state is down), the 2.5s probe drains
        time::sleep(Duration::from_millis(1300)).await;

        assert!(handle.is_available());
        assert_eq!(handle.total_persisted(), 3);
        assert_eq!(handle.pending_count(), 0);

        // drained strictly oldest-first
        let ids: Vec<u64> = store.saved().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn probe_is_skipped_while_the_store_is_believed_up() {
        let store = Arc::new(MemoryStore::new());
        let handle = Recorder::builder()
            .recording_interval(Duration::from_secs(1))
            .recovery_interval(Duration::from_secs(2))
            .build(store.clone())
            .start();

        time::sleep(Duration::from_millis(6500)).await;

        // three probe intervals elapsed, none of them called the store
        assert_eq!(store.probe_attempts(), 0);

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_is_idempotent_and_reports_stable_counters() {
        let store = Arc::new(MemoryStore::new());
        let handle = quick_recorder(store).start();

        time::sleep(Duration::from_millis(1500)).await;

        let first = handle.shutdown(Duration::from_secs(5)).await;
        let second = handle.shutdown(Duration::from_secs(5)).await;

        assert!(first.clean);
        assert_eq!(first, second);
        assert_eq!(first.total_persisted, 2);
        assert_eq!(first.pending_samples, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_shutdown_still_reports_the_queue() {
        let store = Arc::new(MemoryStore::offline());
        let handle = quick_recorder(store).start();

        // three failed ticks: 0s, 1s, 2s
        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(handle.pending_count(), 3);

        let report = handle.shutdown(Duration::ZERO).await;

        assert_eq!(report.pending_samples, 3);
        assert_eq!(report.total_persisted, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_recorder_takes_no_more_samples() {
        let store = Arc::new(MemoryStore::new());
        let handle = quick_recorder(store.clone()).start();

        time::sleep(Duration::from_millis(1500)).await;
        let report = handle.shutdown(Duration::from_secs(5)).await;
        assert_eq!(report.total_persisted, 2);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.total_persisted(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn all_records_lists_persisted_samples_in_order() {
        let store = Arc::new(MemoryStore::new());
        let handle = quick_recorder(store).start();

        time::sleep(Duration::from_millis(2500)).await;

        let records = handle.all_records().await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].recorded_at <= w[1].recorded_at));

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn all_records_fails_fast_while_the_store_is_down() {
        let store = Arc::new(MemoryStore::offline());
        let handle = quick_recorder(store).start();

        time::sleep(Duration::from_millis(1500)).await;

        match handle.all_records().await {
            Err(QueryError::StoreOffline { pending }) => assert_eq!(pending, 2),
            other => panic!("expected StoreOffline, got {other:?}"),
        }

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn listing_failure_flips_the_connectivity_state() {
        let store = Arc::new(MemoryStore::new());
        let handle = quick_recorder(store.clone()).start();

        time::sleep(Duration::from_millis(500)).await;
        assert!(handle.is_available());

        store.set_online(false);
        let err = handle.all_records().await.unwrap_err();
        assert!(matches!(err, QueryError::QueryFailed(_)));
        assert!(!handle.is_available());

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn status_snapshot_matches_the_observers() {
        let store = Arc::new(MemoryStore::new());
        let handle = quick_recorder(store).start();

        time::sleep(Duration::from_millis(1500)).await;

        let status = handle.status();
        assert_eq!(status.total_persisted, handle.total_persisted());
        assert_eq!(status.pending_samples, handle.pending_count() as u64);
        assert_eq!(status.store_available, handle.is_available());

        handle.shutdown(Duration::from_secs(5)).await;
    }

    #[test]
    fn builder_setters_override_defaults() {
        let recorder = Recorder::builder()
            .recording_interval(Duration::from_millis(250))
            .recovery_interval(Duration::from_secs(2))
            .shutdown_timeout(Duration::from_secs(1))
            .build(MemoryStore::new());

        assert_eq!(recorder.config.recording_interval, Duration::from_millis(250));
        assert_eq!(recorder.config.recovery_interval, Duration::from_secs(2));
        assert_eq!(recorder.config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn builder_defaults_match_config_defaults() {
        let recorder = Recorder::builder().build(MemoryStore::new());
        assert_eq!(recorder.config, RecorderConfig::default());
    }
}
