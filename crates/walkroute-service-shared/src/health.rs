//! Health check handlers for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    /// Street-network source label (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_source: Option<String>,

    /// Configured waypoint cap (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_waypoints: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            graph_source: None,
            max_waypoints: None,
        }
    }

    pub fn ready(service: &str, version: &str, graph_source: &str, max_waypoints: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            graph_source: Some(graph_source.to_string()),
            max_waypoints: Some(max_waypoints),
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            graph_source: None,
            max_waypoints: None,
        }
    }
}

/// Liveness probe handler. Always 200 while the process is serving.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"walkroute-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 503 when the configured network file has disappeared.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let source = state.source();

    if !source.is_available() {
        let status = HealthStatus::not_ready(service, version, "graph source unavailable");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(
        service,
        version,
        source.label(),
        state.options().max_waypoints,
    );
    (StatusCode::OK, Json(status)).into_response()
}
