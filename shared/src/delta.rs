//! Elapsed-seconds computation from extracted timestamps.
//!
//! Converts the raw string pulled out of a state file into a signed age in
//! seconds relative to "now". Negative results are legitimate (clock skew,
//! future-dated markers) and are passed through unmodified.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Published in place of a real age when a poll fails, so consumers that
/// expect a numeric value always get one. Not a claim that -1 seconds
/// elapsed.
pub const SENTINEL_DELTA: i64 = -1;

/// Timestamp encodings understood by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Raw integer seconds since the Unix epoch (global marker file).
    UnixEpoch,
    /// RFC 3339 timestamp (per-repository state files).
    Rfc3339,
}

/// Errors that can occur while computing an age delta.
#[derive(Debug, Error)]
pub enum DeltaError {
    /// The extractor produced nothing; the expected line was absent.
    #[error("timestamp line not found")]
    MissingTimestamp,

    /// A timestamp was present but not in the expected format.
    #[error("failed to parse timestamp '{raw}' as {format:?}: {reason}")]
    Parse {
        /// The raw string that failed to parse.
        raw: String,
        /// The format the string was expected to be in.
        format: TimestampFormat,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Computes seconds elapsed between `now` and the timestamp in `raw`.
///
/// An empty `raw` fails with [`DeltaError::MissingTimestamp`]; a non-empty
/// but malformed `raw` fails with [`DeltaError::Parse`]. The two cases are
/// kept distinct so operators can tell a truncated state file from a
/// corrupt one.
///
/// # Errors
///
/// Returns [`DeltaError`] when `raw` is empty or cannot be parsed in
/// `format`.
pub fn compute_delta_at(
    raw: &str,
    format: TimestampFormat,
    now: DateTime<Utc>,
) -> Result<i64, DeltaError> {
    if raw.is_empty() {
        return Err(DeltaError::MissingTimestamp);
    }

    let parsed = match format {
        TimestampFormat::UnixEpoch => raw.parse::<i64>().map_err(|e| DeltaError::Parse {
            raw: raw.to_string(),
            format,
            reason: e.to_string(),
        })?,
        TimestampFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| DeltaError::Parse {
                raw: raw.to_string(),
                format,
                reason: e.to_string(),
            })?
            .timestamp(),
    };

    Ok(now.timestamp() - parsed)
}

/// Computes seconds elapsed between the current wall clock and `raw`.
///
/// # Errors
///
/// Returns [`DeltaError`] when `raw` is empty or cannot be parsed in
/// `format`.
pub fn compute_delta(raw: &str, format: TimestampFormat) -> Result<i64, DeltaError> {
    compute_delta_at(raw, format, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rfc3339_delta() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 10, 0).unwrap();

        let delta = compute_delta_at("2023-01-01T00:00:00Z", TimestampFormat::Rfc3339, now);

        assert_eq!(delta.unwrap(), 600);
    }

    #[test]
    fn test_epoch_delta() {
        let now = Utc.timestamp_opt(1_672_531_800, 0).unwrap();

        let delta = compute_delta_at("1672531200", TimestampFormat::UnixEpoch, now);

        assert_eq!(delta.unwrap(), 600);
    }

    #[test]
    fn test_future_timestamp_gives_negative_delta() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

        let delta = compute_delta_at("2023-01-01T01:00:00Z", TimestampFormat::Rfc3339, now);

        assert_eq!(delta.unwrap(), -3600);
    }

    #[test]
    fn test_empty_input_is_missing_not_parse_error() {
        let now = Utc::now();

        let err = compute_delta_at("", TimestampFormat::Rfc3339, now).unwrap_err();

        assert!(matches!(err, DeltaError::MissingTimestamp));
    }

    #[test]
    fn test_malformed_rfc3339_is_parse_error() {
        let now = Utc::now();

        let err = compute_delta_at("yesterday", TimestampFormat::Rfc3339, now).unwrap_err();

        assert!(matches!(err, DeltaError::Parse { .. }));
    }

    #[test]
    fn test_malformed_epoch_is_parse_error() {
        let now = Utc::now();

        let err = compute_delta_at("12h34", TimestampFormat::UnixEpoch, now).unwrap_err();

        assert!(matches!(err, DeltaError::Parse { .. }));
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 10, 0).unwrap();

        let delta = compute_delta_at("2023-01-01T02:00:00+02:00", TimestampFormat::Rfc3339, now);

        assert_eq!(delta.unwrap(), 600);
    }

    #[test]
    fn test_deltas_monotonic_under_increasing_now() {
        let raw = "2023-01-01T00:00:00Z";
        let mut previous = i64::MIN;

        for minutes in [0, 1, 5, 60, 1440] {
            let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(minutes);
            let delta = compute_delta_at(raw, TimestampFormat::Rfc3339, now).unwrap();
            assert!(delta >= previous);
            previous = delta;
        }
    }
}
