//! tickvault daemon entry point.
//!
//! Records the current time at a fixed cadence into a durable store and
//! keeps recording through store outages. Runs until interrupted; on ctrl-c
//! it shuts down gracefully and logs the final counters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tickvault_engine::{Recorder, RecorderConfig};
use tickvault_store::{JsonlStore, TickStore};
use tracing::{info, warn};

#[cfg(feature = "http")]
use tickvault_store::HttpStore;

mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "tickvault")]
#[command(about = "Resilient wall-clock recorder")]
struct Args {
    /// Path to the JSONL store file
    #[arg(short, long, default_value = "ticks.jsonl")]
    store: PathBuf,

    /// Remote store service endpoint (e.g. http://localhost:8080)
    #[cfg(feature = "http")]
    #[arg(long, conflicts_with = "store")]
    endpoint: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sampling interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Recovery-probe interval in seconds
    #[arg(long)]
    recovery_interval: Option<u64>,

    /// Shutdown timeout in seconds
    #[arg(long)]
    shutdown_timeout: Option<u64>,

    /// Print all stored records as JSON and exit
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let file_settings = Settings::load(args.config.as_deref())?;
    let config = resolve_config(&args, &file_settings);

    let store = build_store(&args).await?;

    if args.dump {
        return dump_records(store.as_ref()).await;
    }

    let handle = Recorder::builder().config(config).build(store).start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("interrupt received, shutting down");

    let report = handle.shutdown(config.shutdown_timeout).await;
    if !report.clean {
        warn!("shutdown exceeded its timeout; in-flight work was cancelled");
    }
    info!(
        total_persisted = report.total_persisted,
        queued = report.pending_samples,
        "recorder stopped"
    );
    Ok(())
}

/// Merge cadences: command-line flags win over file values, file values win
/// over built-in defaults.
fn resolve_config(args: &Args, file: &Settings) -> RecorderConfig {
    let defaults = RecorderConfig::default();
    RecorderConfig {
        recording_interval: seconds_or(
            args.interval.or(file.interval_seconds),
            defaults.recording_interval,
        ),
        recovery_interval: seconds_or(
            args.recovery_interval.or(file.recovery_interval_seconds),
            defaults.recovery_interval,
        ),
        shutdown_timeout: seconds_or(
            args.shutdown_timeout.or(file.shutdown_timeout_seconds),
            defaults.shutdown_timeout,
        ),
    }
}

fn seconds_or(value: Option<u64>, default: Duration) -> Duration {
    value.map(Duration::from_secs).unwrap_or(default)
}

async fn build_store(args: &Args) -> Result<Arc<dyn TickStore>> {
    #[cfg(feature = "http")]
    if let Some(endpoint) = &args.endpoint {
        info!(%endpoint, "using remote store");
        return Ok(Arc::new(HttpStore::builder().endpoint(endpoint).build()));
    }

    let store = JsonlStore::open(&args.store).await.with_context(|| {
        format!("failed to open store file {}", args.store.display())
    })?;
    info!(path = %store.path().display(), "using JSONL store");
    Ok(Arc::new(store))
}

async fn dump_records(store: &dyn TickStore) -> Result<()> {
    let records = store
        .list_all()
        .await
        .context("failed to read records from the store")?;

    let payload = serde_json::json!({
        "records": records,
        "total": records.len(),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
