//! # tickvault-store
//!
//! Store adapters for tickvault: the boundary through which the recording
//! engine persists samples.
//!
//! The engine only ever talks to a [`TickStore`]: a durable, ordered sample
//! store reachable through `save` / `probe` / `list_all`. This crate defines
//! that contract, the [`StoreError`] taxonomy the engine classifies failures
//! with, and ready-to-use adapters:
//!
//! - [`MemoryStore`] - in-process store with an online/offline switch, for
//!   tests and local development
//! - [`JsonlStore`] - append-only JSON Lines file store
//! - `HttpStore` (`http` feature) - client for a remote store service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickvault_store::{JsonlStore, TickStore};
//! use tickvault_types::Sample;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonlStore::open("ticks.jsonl").await?;
//!
//!     let ack = store.save(Sample::now()).await?;
//!     println!("persisted sample {}", ack.id);
//!
//!     let records = store.list_all().await?;
//!     println!("{} samples on disk", records.len());
//!     Ok(())
//! }
//! ```

mod error;
mod jsonl;
mod memory;
mod store;

#[cfg(feature = "http")]
mod http;

pub use error::StoreError;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use store::TickStore;

#[cfg(feature = "http")]
pub use http::{HttpStore, HttpStoreBuilder};

// Re-export types for convenience
pub use tickvault_types::{Sample, SaveAck, StoredSample, UnixMillis};
