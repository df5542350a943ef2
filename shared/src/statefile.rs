//! Buffered timestamp extraction from mirror state files.
//!
//! State files are unstructured text of arbitrary size; the only line this
//! module cares about is the first one starting with a given prefix (for
//! per-repository state files) or the first line of the file (for the
//! global `lastsync` marker). Files are read one line at a time so memory
//! use stays bounded no matter how large the file is.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading a state file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened.
    #[error("failed to open state file {path}: {source}")]
    Open {
        /// Path of the file that could not be opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file was opened but a read failed partway through.
    #[error("failed to read state file {path}: {source}")]
    Read {
        /// Path of the file being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Scans `path` line by line for the first line starting with `line_prefix`.
///
/// Returns `Some(suffix)` with the prefix stripped and the line terminator
/// removed, or `None` when end of file is reached without a match. A
/// missing timestamp line is a recoverable condition for the caller to
/// classify, not an I/O failure.
///
/// Scanning stops at the first match; later matching lines are never
/// inspected.
///
/// # Errors
///
/// Returns [`ExtractError`] if the file cannot be opened or a read fails.
pub fn extract_timestamp(path: &Path, line_prefix: &str) -> Result<Option<String>, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = BufReader::new(file);
    for line in reader.lines() {
        let line = line.map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(suffix) = line.strip_prefix(line_prefix) {
            return Ok(Some(suffix.to_string()));
        }
    }

    Ok(None)
}

/// Reads the first line of `path`, terminator removed.
///
/// Used for the global marker file, whose whole payload is its first line.
/// An empty file yields an empty string.
///
/// # Errors
///
/// Returns [`ExtractError`] if the file cannot be opened or read.
pub fn read_first_line(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}
