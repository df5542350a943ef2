//! Monitor configuration values.
//!
//! [`MonitorConfig`] is constructed once by the exporter binary from its
//! command line and handed to each component constructor. Nothing in the
//! engine reads configuration from process-global state.

use std::path::PathBuf;
use std::time::Duration;

/// Default time between polls, used when no interval is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Runtime configuration for the monitor loops.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Path to the global `lastsync` marker file.
    pub lastsync_file: PathBuf,
    /// Time between polls; always positive.
    pub interval: Duration,
    /// Whether results are published to gauges (`true`) or logged (`false`).
    pub metrics_enabled: bool,
    /// Root directory holding one subdirectory per mirrored repository.
    pub repo_root: Option<PathBuf>,
    /// Repository names to check under `repo_root`.
    pub repo_names: Vec<String>,
}

impl MonitorConfig {
    /// Creates a monitor configuration.
    ///
    /// A zero `interval` falls back to [`DEFAULT_POLL_INTERVAL`]. The
    /// fallback is applied here, once, so both polling loops observe the
    /// same effective interval.
    #[must_use]
    pub fn new(lastsync_file: PathBuf, interval: Duration, metrics_enabled: bool) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };

        Self {
            lastsync_file,
            interval,
            metrics_enabled,
            repo_root: None,
            repo_names: Vec::new(),
        }
    }

    /// Sets the repository root and name list for per-repository checking.
    #[must_use]
    pub fn with_repositories(mut self, root: PathBuf, names: Vec<String>) -> Self {
        self.repo_root = Some(root);
        self.repo_names = names;
        self
    }

    /// Returns true when per-repository checking is configured.
    ///
    /// Requires both a repository root and a non-empty name list; either
    /// alone is not enough to start the repository loop.
    #[must_use]
    pub fn should_check_repos(&self) -> bool {
        self.repo_root.is_some() && !self.repo_names.is_empty()
    }
}
