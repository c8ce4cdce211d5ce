//! # tickvault-engine
//!
//! The resilient time-recording engine. A [`Recorder`] samples the wall
//! clock at a fixed cadence and persists every sample to a
//! [`TickStore`](tickvault_store::TickStore), surviving store outages of any
//! length: while the store is down, samples park in an in-memory FIFO queue
//! and are drained in order once a recovery probe sees the store again.
//!
//! ## Guarantees
//!
//! - A sample is always in exactly one place: in flight to the store, in
//!   the overflow queue, or durably persisted - never duplicated, never
//!   silently dropped on a store failure
//! - Queued samples drain strictly oldest-first; a drain stops at the first
//!   failure instead of skipping past it
//! - Each periodic activity never overlaps itself; a tick that would do so
//!   is skipped (cadence is best-effort, not real-time)
//! - Shutdown is bounded: in-flight work gets a configurable grace period,
//!   then gets cancelled, and the final counters are always reported
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tickvault_engine::Recorder;
//! use tickvault_store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = Recorder::builder()
//!         .recording_interval(Duration::from_secs(1))
//!         .recovery_interval(Duration::from_secs(5))
//!         .build(MemoryStore::new())
//!         .start();
//!
//!     // ... the sampler is now running in the background ...
//!
//!     let report = handle.shutdown(Duration::from_secs(10)).await;
//!     println!(
//!         "persisted {} samples, {} still queued",
//!         report.total_persisted, report.pending_samples
//!     );
//! }
//! ```

mod config;
mod error;
mod queue;
mod recorder;
mod state;
mod ticks;

pub use config::RecorderConfig;
pub use error::QueryError;
pub use recorder::{Recorder, RecorderBuilder, RecorderHandle, ShutdownReport};

// Re-export types for convenience
pub use tickvault_types::{RecorderStatus, Sample, SaveAck, StoredSample, UnixMillis};
