//! Prometheus-backed metric sinks.
//!
//! Bridges the engine's write-only [`MetricSink`] seam to `prometheus`
//! gauges registered on the exporter's registry.

use prometheus::{Gauge, Opts, Registry};
use shared::metrics::MetricSink;

/// Gauge name for the global lastsync age.
pub const SYNC_GAUGE_NAME: &str = "repo_sync_seconds";

/// A [`MetricSink`] writing through to a Prometheus gauge.
pub struct PrometheusSink {
    gauge: Gauge,
}

impl MetricSink for PrometheusSink {
    fn set(&self, value: f64) {
        self.gauge.set(value);
    }
}

/// Creates and registers the global lastsync gauge.
///
/// # Errors
///
/// Returns an error if the gauge cannot be created or registered.
pub fn global_sync_sink(registry: &Registry) -> Result<Box<dyn MetricSink>, prometheus::Error> {
    let gauge = Gauge::with_opts(Opts::new(SYNC_GAUGE_NAME, "Seconds after last sync"))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(Box::new(PrometheusSink { gauge }))
}

/// Creates and registers the per-repository state-age gauge.
///
/// Registration can fail when the same repository name is configured
/// twice; the gauge is still returned unregistered so the duplicate entry
/// keeps its own working sink, and the collision is logged once.
///
/// # Panics
///
/// Panics if the sanitized gauge name is rejected by the metrics library,
/// which sanitizing prevents.
pub fn repo_state_sink(registry: &Registry, repo_name: &str) -> Box<dyn MetricSink> {
    let metric_name = repo_state_gauge_name(repo_name);
    let help = format!("Seconds after timestamp in '{repo_name}' repo state file");

    let gauge = Gauge::with_opts(Opts::new(metric_name, help))
        .expect("sanitized gauge name is a valid metric name");

    if let Err(e) = registry.register(Box::new(gauge.clone())) {
        tracing::warn!(repository = %repo_name, error = %e, "gauge not registered");
    }

    Box::new(PrometheusSink { gauge })
}

/// Gauge name for one repository's state age.
#[must_use]
pub fn repo_state_gauge_name(repo_name: &str) -> String {
    format!("repo_{}_state_seconds_old", sanitize(repo_name))
}

/// Replaces characters that are not valid in a Prometheus metric name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_sink_registers_gauge() {
        let registry = Registry::new();

        let sink = global_sync_sink(&registry).unwrap();
        sink.set(600.0);

        let families = registry.gather();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].get_name(), SYNC_GAUGE_NAME);
        assert!((families[0].get_metric()[0].get_gauge().get_value() - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repo_sink_name_and_value() {
        let registry = Registry::new();

        let sink = repo_state_sink(&registry, "core");
        sink.set(-1.0);

        let families = registry.gather();
        assert_eq!(families[0].get_name(), "repo_core_state_seconds_old");
        assert!((families[0].get_metric()[0].get_gauge().get_value() + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_repo_name_still_yields_working_sink() {
        let registry = Registry::new();

        let first = repo_state_sink(&registry, "core");
        let second = repo_state_sink(&registry, "core");
        first.set(1.0);
        second.set(2.0);

        // Only the first registration is exposed; the duplicate still
        // accepts writes without panicking.
        assert_eq!(registry.gather().len(), 1);
    }

    #[test]
    fn test_gauge_name_sanitized() {
        assert_eq!(
            repo_state_gauge_name("core-x86_64"),
            "repo_core_x86_64_state_seconds_old"
        );
        assert_eq!(repo_state_gauge_name("extra"), "repo_extra_state_seconds_old");
    }
}
