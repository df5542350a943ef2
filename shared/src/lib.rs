//! Syncwatch Shared Library
//!
//! This crate contains the mirror-monitoring engine used by the Syncwatch
//! exporter: repository discovery, state-file timestamp extraction, age
//! computation, and the periodic polling loops.
//!
//! # Modules
//!
//! - [`config`] - Monitor configuration values
//! - [`statefile`] - Buffered timestamp extraction from state files
//! - [`delta`] - Elapsed-seconds computation from extracted timestamps
//! - [`registry`] - Repository discovery and validation
//! - [`checker`] - Periodic polling loops
//! - [`metrics`] - The write-only gauge seam between engine and exposition
//!
//! # Example
//!
//! ```
//! use shared::delta::{compute_delta_at, TimestampFormat};
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 10, 0).unwrap();
//! let age = compute_delta_at("2023-01-01T00:00:00Z", TimestampFormat::Rfc3339, now).unwrap();
//! assert_eq!(age, 600);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checker;
pub mod config;
pub mod delta;
pub mod metrics;
pub mod registry;
pub mod statefile;

/// Re-export common dependencies for convenience.
pub use chrono;
