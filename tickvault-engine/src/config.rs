//! Recorder configuration.

use std::time::Duration;

/// Timing configuration for the recorder.
///
/// All cadences are best-effort: a tick that would overlap a still-running
/// one of the same activity is skipped, never run concurrently with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    /// How often the sampler observes the clock. The first sample is taken
    /// immediately on start. Default: 1 second.
    pub recording_interval: Duration,

    /// How often store reachability is re-probed while the store is down.
    /// The first probe fires one full interval after start. Default: 5
    /// seconds.
    pub recovery_interval: Duration,

    /// How long a shutdown waits for in-flight work before cancelling it.
    /// Default: 10 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recording_interval: Duration::from_secs(1),
            recovery_interval: Duration::from_secs(5),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}
