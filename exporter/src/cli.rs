//! Command-line interface for the exporter.
//!
//! Every flag has an environment fallback so the exporter can be
//! configured from a systemd unit or container environment without a
//! wrapper script.

use clap::Parser;
use shared::config::MonitorConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Syncwatch - Prometheus gauges for package-mirror staleness
#[derive(Parser, Debug)]
#[command(name = "syncwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the lastsync marker file
    #[arg(short, long, env = "SYNCWATCH_FILE")]
    pub file: PathBuf,

    /// Port to serve metrics at (0 disables the metrics server)
    #[arg(short, long, env = "SYNCWATCH_PORT", default_value_t = 0)]
    pub port: u16,

    /// Seconds between checks (0 falls back to the 5 minute default)
    #[arg(short, long, env = "SYNCWATCH_INTERVAL", default_value_t = 0)]
    pub interval: u64,

    /// Path to the directory holding the mirrored repositories
    #[arg(long, env = "SYNCWATCH_REPO_PATH")]
    pub repo_path: Option<PathBuf>,

    /// Comma-separated list of repositories to check
    #[arg(long, env = "SYNCWATCH_REPO_LIST")]
    pub repo_list: Option<String>,
}

impl Cli {
    /// Builds the monitor configuration from the parsed flags.
    ///
    /// A port of 0 disables metrics publishing; the repository checker is
    /// configured only when both a repository path and a non-empty list
    /// are given.
    #[must_use]
    pub fn into_config(self) -> MonitorConfig {
        let metrics_enabled = self.port != 0;
        let mut config =
            MonitorConfig::new(self.file, Duration::from_secs(self.interval), metrics_enabled);

        if let Some(root) = self.repo_path {
            let names = self.repo_list.as_deref().map(parse_repo_list).unwrap_or_default();
            config = config.with_repositories(root, names);
        }

        config
    }
}

/// Splits a comma-separated repository list, trimming whitespace and
/// dropping empty segments.
fn parse_repo_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
