//! Settings file support.
//!
//! A TOML file can pre-set the recorder cadences, mirroring the
//! command-line flags:
//!
//! ```toml
//! interval_seconds = 1
//! recovery_interval_seconds = 5
//! shutdown_timeout_seconds = 10
//! ```
//!
//! Flags win over file values, file values win over built-in defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Cadence overrides read from a settings file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub interval_seconds: Option<u64>,
    pub recovery_interval_seconds: Option<u64>,
    pub shutdown_timeout_seconds: Option<u64>,
}

impl Settings {
    /// Load settings from the given file, or defaults when no file is
    /// configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()
            .with_context(|| format!("failed to read settings file {}", path.display()))?;

        settings
            .try_deserialize()
            .context("invalid settings file")
    }
}
