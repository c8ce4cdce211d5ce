//! HTTP store client.
//!
//! Talks to a remote store service over its JSON API:
//!
//! - `POST /samples` persists one sample and answers with the assigned ack
//! - `GET /health` is the liveness probe
//! - `GET /samples` lists everything, ordered by recording instant
//!
//! Connection and timeout failures map to the transient error class, so an
//! unreachable service is treated like any other store outage.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tickvault_store::{HttpStore, TickStore};
//! use tickvault_types::Sample;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpStore::builder()
//!         .endpoint("http://localhost:8080")
//!         .build();
//!
//!     let ack = store.save(Sample::now()).await?;
//!     println!("persisted as {}", ack.id);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tickvault_types::{Sample, SaveAck, StoredSample};

use crate::{StoreError, TickStore};

/// A [`TickStore`] client for a remote store service.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    endpoint: String,
}

impl HttpStore {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpStoreBuilder {
        HttpStoreBuilder::default()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

#[async_trait]
impl TickStore for HttpStore {
    async fn save(&self, sample: Sample) -> Result<SaveAck, StoreError> {
        let response = self
            .client
            .post(self.url("/samples"))
            .json(&sample)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Http(format!(
                "save returned status {}",
                response.status()
            )));
        }

        response
            .json::<SaveAck>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn probe(&self) -> Result<(), StoreError> {
        let response = self.client.get(self.url("/health")).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Http(format!(
                "health check returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<StoredSample>, StoreError> {
        let response = self.client.get(self.url("/samples")).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Http(format!(
                "listing returned status {}",
                response.status()
            )));
        }

        let mut records = response
            .json::<Vec<StoredSample>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        // normalize even if the service already orders its answer
        records.sort_by_key(|r| r.recorded_at);
        Ok(records)
    }
}

/// Builder for [`HttpStore`].
#[derive(Debug, Default)]
pub struct HttpStoreBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpStoreBuilder {
    /// Set the service endpoint (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> HttpStore {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        HttpStore {
            client,
            endpoint: self
                .endpoint
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
        }
    }
}
