//! Syncwatch Exporter
//!
//! This crate wires the monitoring engine from `shared` to its runtime
//! surroundings: command-line configuration, Prometheus gauges, the HTTP
//! exposition server, and process lifecycle.
//!
//! Two background loops run for the life of the process: one watching the
//! global `lastsync` marker, one walking the verified repository registry
//! (only when repository checking is configured). They share no state.
//! With a metrics port configured the process serves `/metrics`; without
//! one it logs each measurement and waits for Ctrl+C.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cli;
pub mod routes;
pub mod sink;

pub use cli::Cli;

use anyhow::Result;
use prometheus::Registry;
use shared::checker::{StateChecker, SyncChecker};
use shared::config::MonitorConfig;
use shared::registry::RepositoryRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the exporter with the parsed command line.
///
/// Spawns the polling loops and then either serves the metrics endpoint
/// until shutdown or, with metrics disabled, waits for a shutdown signal
/// while the loops log their results.
///
/// # Errors
///
/// Returns an error if a gauge cannot be registered or the server fails
/// to bind or serve.
pub async fn run(cli: Cli) -> Result<()> {
    let port = cli.port;
    let config = cli.into_config();
    let registry = Arc::new(Registry::new());

    tracing::info!(
        interval_secs = config.interval.as_secs(),
        metrics_enabled = config.metrics_enabled,
        "syncwatch starting"
    );

    let sync_sink = sink::global_sync_sink(&registry)?;
    tokio::spawn(SyncChecker::new(&config, sync_sink).run());

    if config.should_check_repos() {
        spawn_state_checker(&config, &registry);
    }

    if config.metrics_enabled {
        serve(registry, port).await
    } else {
        println!("Press Ctrl+C to end");
        shutdown_signal().await;
        Ok(())
    }
}

/// Builds the repository registry and starts its polling loop.
///
/// A fatal registry error (nothing configured, unreadable or empty root)
/// is logged once and only prevents this loop from starting; the lastsync
/// loop and the server are unaffected.
fn spawn_state_checker(config: &MonitorConfig, registry: &Arc<Registry>) {
    let Some(root) = config.repo_root.clone() else {
        return;
    };

    match RepositoryRegistry::build(&root, &config.repo_names, |name| {
        sink::repo_state_sink(registry, name)
    }) {
        Ok(repos) => {
            tracing::info!(
                configured = config.repo_names.len(),
                verified = repos.len(),
                "repository registry built"
            );
            tokio::spawn(StateChecker::new(config, repos).run());
        }
        Err(e) => {
            tracing::error!(error = %e, "state checker not started");
        }
    }
}

/// Serves the metrics endpoint until a shutdown signal arrives.
async fn serve(registry: Arc<Registry>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = routes::metrics_routes(registry).layer(TraceLayer::new_for_http());
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "metrics server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
