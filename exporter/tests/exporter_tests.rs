//! Integration tests for the Syncwatch exporter.
//!
//! These tests drive the full pipeline: a temporary mirror tree on disk,
//! registry discovery with real Prometheus gauges, one polling pass, and
//! the `/metrics` exposition over the router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use exporter::routes::metrics_routes;
use exporter::sink::{global_sync_sink, repo_state_sink};
use http_body_util::BodyExt;
use prometheus::Registry;
use shared::checker::{StateChecker, SyncChecker};
use shared::config::MonitorConfig;
use shared::registry::RepositoryRegistry;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn mirror_with_repos(repos: &[(&str, &str)]) -> TempDir {
    let root = TempDir::new().expect("create temp mirror");
    for (name, state_content) in repos {
        let dir = root.path().join(name);
        fs::create_dir(&dir).expect("create repo dir");
        fs::write(dir.join("state"), state_content).expect("write state file");
    }
    root
}

async fn scrape(app: axum::Router) -> (StatusCode, String) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_lastsync_poll_reaches_metrics_endpoint() {
    let root = TempDir::new().unwrap();
    let lastsync = root.path().join("lastsync");
    // Epoch 0 keeps the expected delta large and positive.
    fs::write(&lastsync, "0\n").unwrap();

    let registry = Arc::new(Registry::new());
    let config = MonitorConfig::new(lastsync, Duration::from_secs(60), true);
    let checker = SyncChecker::new(&config, global_sync_sink(&registry).unwrap());
    let result = checker.poll_once();
    assert!(result.is_ok());

    let (status, body) = scrape(metrics_routes(registry)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("repo_sync_seconds"));
    assert!(!body.contains("repo_sync_seconds -1"));
}

#[tokio::test]
async fn test_repository_poll_reaches_metrics_endpoint() {
    let root = mirror_with_repos(&[
        ("core", "date=2023-01-01T00:00:00Z\n"),
        ("broken", "date=garbage\n"),
    ]);
    let registry = Arc::new(Registry::new());

    let repos = RepositoryRegistry::build(
        root.path(),
        &["core".to_string(), "broken".to_string(), "missing".to_string()],
        |name| repo_state_sink(&registry, name),
    )
    .unwrap();
    assert_eq!(repos.len(), 2);

    let config = MonitorConfig::new(root.path().join("lastsync"), Duration::from_secs(60), true);
    let checker = StateChecker::new(&config, repos);
    let results = checker.poll_once();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(!results[1].is_ok());

    let (status, body) = scrape(metrics_routes(registry)).await;

    assert_eq!(status, StatusCode::OK);
    // The healthy repository carries a real age, the broken one the
    // sentinel; the missing one never got a gauge.
    assert!(body.contains("repo_core_state_seconds_old"));
    assert!(body.contains("repo_broken_state_seconds_old -1"));
    assert!(!body.contains("repo_missing_state_seconds_old"));
}

#[tokio::test]
async fn test_fatal_registry_error_leaves_global_gauge_alive() {
    let registry = Arc::new(Registry::new());
    let sink = global_sync_sink(&registry).unwrap();
    sink.set(42.0);

    // An unreadable root is fatal for the repository loop only.
    let err = RepositoryRegistry::build(
        std::path::Path::new("/nonexistent/mirror"),
        &["core".to_string()],
        |name| repo_state_sink(&registry, name),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        shared::registry::RegistryError::RootUnreadable { .. }
    ));

    let (status, body) = scrape(metrics_routes(registry)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("repo_sync_seconds 42"));
}
