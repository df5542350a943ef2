//! Periodic polling loops.
//!
//! Two independent checkers exist: [`SyncChecker`] watches the single
//! global `lastsync` marker, [`StateChecker`] walks the verified
//! repository registry. Each runs forever on its own fixed interval and
//! publishes one value per source per tick. A failing source is logged
//! and published as the sentinel for that tick; it never stops the loop
//! or the sources after it.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::time::interval;

use crate::config::MonitorConfig;
use crate::delta::{compute_delta_at, DeltaError, TimestampFormat, SENTINEL_DELTA};
use crate::metrics::MetricSink;
use crate::registry::{RepositoryRegistry, TIMESTAMP_LINE_PREFIX};
use crate::statefile::{extract_timestamp, read_first_line, ExtractError};

/// Errors that can occur while polling a single source.
#[derive(Debug, Error)]
pub enum PollError {
    /// Reading the state file failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The timestamp was absent or malformed.
    #[error(transparent)]
    Delta(#[from] DeltaError),
}

/// Identifies which source a poll result belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollSource {
    /// The global `lastsync` marker file.
    GlobalMarker,
    /// A verified repository, by name.
    Repository(String),
}

/// Outcome of polling one source during one tick.
///
/// Produced and consumed within a single tick; never persisted.
#[derive(Debug)]
pub struct PollResult {
    /// The source that was polled.
    pub source: PollSource,
    /// Age in seconds; [`SENTINEL_DELTA`] when the poll failed.
    pub age_seconds: i64,
    /// The failure, if the poll failed.
    pub error: Option<PollError>,
}

impl PollResult {
    /// True when the poll produced a real measurement.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Reads a repository state file and computes its age at `now`.
///
/// # Errors
///
/// Returns [`PollError`] if the file cannot be read, the `date=` line is
/// absent, or its timestamp is malformed.
pub fn read_state_delta_at(state_file: &Path, now: DateTime<Utc>) -> Result<i64, PollError> {
    let raw = extract_timestamp(state_file, TIMESTAMP_LINE_PREFIX)?
        .ok_or(DeltaError::MissingTimestamp)?;
    Ok(compute_delta_at(&raw, TimestampFormat::Rfc3339, now)?)
}

/// Reads the global marker file and computes its age at `now`.
///
/// # Errors
///
/// Returns [`PollError`] if the file cannot be read or its first line is
/// empty or not an epoch integer.
pub fn read_sync_delta_at(lastsync_file: &Path, now: DateTime<Utc>) -> Result<i64, PollError> {
    let raw = read_first_line(lastsync_file)?;
    Ok(compute_delta_at(&raw, TimestampFormat::UnixEpoch, now)?)
}

/// Polls the verified repository registry on a fixed interval.
pub struct StateChecker {
    registry: RepositoryRegistry,
    interval: std::time::Duration,
    metrics_enabled: bool,
}

impl StateChecker {
    /// Creates a checker over an already-built registry.
    #[must_use]
    pub fn new(config: &MonitorConfig, registry: RepositoryRegistry) -> Self {
        Self {
            registry,
            interval: config.interval,
            metrics_enabled: config.metrics_enabled,
        }
    }

    /// Polls every repository once, publishing as it goes.
    ///
    /// Repositories are polled sequentially; a failure is logged, published
    /// as the sentinel for that repository, and does not affect the
    /// repositories after it. The returned results let callers inspect a
    /// tick without depending on timing.
    pub fn poll_once(&self) -> Vec<PollResult> {
        self.poll_at(Utc::now())
    }

    fn poll_at(&self, now: DateTime<Utc>) -> Vec<PollResult> {
        let mut results = Vec::with_capacity(self.registry.len());
        for repo in self.registry.repositories() {
            let (age_seconds, error) = match read_state_delta_at(repo.state_file(), now) {
                Ok(delta) => (delta, None),
                Err(e) => {
                    tracing::warn!(repository = %repo.name(), error = %e, "state poll failed");
                    (SENTINEL_DELTA, Some(e))
                }
            };

            if self.metrics_enabled {
                #[allow(clippy::cast_precision_loss)]
                repo.sink().set(age_seconds as f64);
            } else {
                tracing::info!(
                    repository = %repo.name(),
                    age_seconds,
                    "state file age"
                );
            }

            results.push(PollResult {
                source: PollSource::Repository(repo.name().to_string()),
                age_seconds,
                error,
            });
        }
        results
    }

    /// Runs the polling loop until the process exits.
    ///
    /// The interval is fixed for the process lifetime; there is no
    /// reconfiguration and no cancellation.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            repositories = self.registry.len(),
            "repository state checker started"
        );

        let mut tick = interval(self.interval);
        loop {
            tick.tick().await;
            self.poll_once();
        }
    }
}

/// Polls the global `lastsync` marker on a fixed interval.
pub struct SyncChecker {
    lastsync_file: PathBuf,
    interval: std::time::Duration,
    metrics_enabled: bool,
    sink: Box<dyn MetricSink>,
}

impl SyncChecker {
    /// Creates a checker over the configured marker file and gauge.
    #[must_use]
    pub fn new(config: &MonitorConfig, sink: Box<dyn MetricSink>) -> Self {
        Self {
            lastsync_file: config.lastsync_file.clone(),
            interval: config.interval,
            metrics_enabled: config.metrics_enabled,
            sink,
        }
    }

    /// Polls the marker file once, publishing the result.
    pub fn poll_once(&self) -> PollResult {
        self.poll_at(Utc::now())
    }

    fn poll_at(&self, now: DateTime<Utc>) -> PollResult {
        let (age_seconds, error) = match read_sync_delta_at(&self.lastsync_file, now) {
            Ok(delta) => (delta, None),
            Err(e) => {
                tracing::warn!(error = %e, "lastsync poll failed");
                (SENTINEL_DELTA, Some(e))
            }
        };

        if self.metrics_enabled {
            #[allow(clippy::cast_precision_loss)]
            self.sink.set(age_seconds as f64);
        } else {
            tracing::info!(age_seconds, "last sync age");
        }

        PollResult {
            source: PollSource::GlobalMarker,
            age_seconds,
            error,
        }
    }

    /// Runs the polling loop until the process exits.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            file = %self.lastsync_file.display(),
            "lastsync checker started"
        );

        let mut tick = interval(self.interval);
        loop {
            tick.tick().await;
            self.poll_once();
        }
    }
}
