//! Append-only JSON Lines store.
//!
//! Each persisted sample is one JSON object on its own line. Sequence ids
//! are assigned in append order and recovered by reading the last line on
//! open, so ids keep increasing across restarts.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tickvault_store::{JsonlStore, TickStore};
//! use tickvault_types::Sample;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonlStore::open("ticks.jsonl").await?;
//!     let ack = store.save(Sample::now()).await?;
//!     assert!(ack.id >= 1);
//!     Ok(())
//! }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tickvault_types::{Sample, SaveAck, StoredSample, UnixMillis};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{StoreError, TickStore};

/// A [`TickStore`] backed by a newline-delimited JSON file.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    next_id: AtomicU64,
    // appends are serialized so concurrent saves cannot interleave lines
    append_lock: Mutex<()>,
}

impl JsonlStore {
    /// Open (or create) the store file and recover the id sequence from it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let last_id = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| {
                    serde_json::from_str::<StoredSample>(line)
                        .map(|record| record.id)
                        .map_err(|e| StoreError::Parse(e.to_string()))
                })
                .transpose()?
                .unwrap_or(0),
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            next_id: AtomicU64::new(last_id),
            append_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TickStore for JsonlStore {
    async fn save(&self, sample: Sample) -> Result<SaveAck, StoreError> {
        let _guard = self.append_lock.lock().await;

        let id = self.next_id.load(Ordering::Acquire) + 1;
        let record = StoredSample {
            id,
            recorded_at: sample.recorded_at,
            persisted_at: UnixMillis::now(),
        };

        let mut line =
            serde_json::to_string(&record).map_err(|e| StoreError::Serialize(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.sync_data().await?;

        // the id is only handed out once the bytes are on disk
        self.next_id.store(id, Ordering::Release);
        Ok(SaveAck {
            id,
            persisted_at: record.persisted_at,
        })
    }

    async fn probe(&self) -> Result<(), StoreError> {
        // opening for append exercises the same path a save needs
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<StoredSample>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str::<StoredSample>(line)
                    .map_err(|e| StoreError::Parse(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        records.sort_by_key(|r| r.recorded_at);
        Ok(records)
    }
}
