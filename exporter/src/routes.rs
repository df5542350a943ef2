//! HTTP routes for the exporter.
//!
//! Serves a small landing page, a JSON health check, and the Prometheus
//! text exposition of the registry.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::{routing::get, Json, Router};
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Creates the exporter routes over the given metrics registry.
pub fn metrics_routes(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(serve_metrics))
        .with_state(registry)
}

/// Landing page pointing operators at the metrics endpoint.
async fn index() -> Html<&'static str> {
    Html(
        "<html>\
         <head><title>Syncwatch</title></head>\
         <body>\
         <h1>Syncwatch Metrics Server</h1>\
         <p><a href=\"/metrics\">Metrics</a></p>\
         </body>\
         </html>",
    )
}

/// Health check handler.
///
/// Returns a simple JSON response indicating the service is healthy.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "syncwatch",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus text exposition of every registered gauge.
async fn serve_metrics(
    State(registry): State<Arc<Registry>>,
) -> Result<([(header::HeaderName, String); 1], String), StatusCode> {
    let encoder = TextEncoder::new();
    match encoder.encode_to_string(&registry.gather()) {
        Ok(body) => Ok(([(header::CONTENT_TYPE, encoder.format_type().to_string())], body)),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
