//! Configuration module for Syncwatch.
//!
//! This module contains the monitor configuration value that is built once
//! at startup and passed by reference into every component constructor.

pub mod monitor;

pub use monitor::{MonitorConfig, DEFAULT_POLL_INTERVAL};
