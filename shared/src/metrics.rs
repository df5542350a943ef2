//! The gauge seam between the polling engine and the exposition layer.
//!
//! The engine only ever writes numeric values; it never reads a gauge back
//! and never cares how values are exposed. `MetricSink` captures exactly
//! that, allowing a Prometheus gauge in production and an in-memory
//! recorder in tests.

use std::sync::{Arc, RwLock};

/// A write-only numeric gauge keyed by whatever identity its creator gave it.
pub trait MetricSink: Send + Sync {
    /// Overwrites the gauge with `value`.
    fn set(&self, value: f64);
}

/// In-memory sink that records every value set on it.
///
/// Used by tests and anywhere a poll result needs to be observed without a
/// metrics backend.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    values: Arc<RwLock<Vec<f64>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently set value, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.read().expect("sink lock poisoned").last().copied()
    }

    /// Returns every value set so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn recorded(&self) -> Vec<f64> {
        self.values.read().expect("sink lock poisoned").clone()
    }
}

impl MetricSink for RecordingSink {
    fn set(&self, value: f64) {
        self.values.write().expect("sink lock poisoned").push(value);
    }
}
