//! Prometheus metrics for the walkroute services.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use walkroute_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::from_env()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// - `METRICS_ENABLED`: anything but "false" enables (default: true)
    /// - `METRICS_PATH`: endpoint path (default: "/metrics")
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            enabled: var("METRICS_ENABLED")
                .map(|value| !value.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            path: var("METRICS_PATH").unwrap_or_else(|| "/metrics".to_string()),
        }
    }
}

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Prometheus exposition text for the `/metrics` endpoint.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# metrics not initialized\n".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Count a planned walk, labelled by sequencer ("exhaustive" or "parallel").
pub fn record_route_calculated(sequencer: &str) {
    metrics::counter!(
        "walkroute_routes_calculated_total",
        "sequencer" => sequencer.to_string()
    )
    .increment(1);
}

/// Count a failed walk, labelled by error kind (e.g. "no_route_found").
pub fn record_route_failed(reason: &str) {
    metrics::counter!(
        "walkroute_routes_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

pub fn record_route_waypoints(waypoints: usize) {
    metrics::histogram!("walkroute_route_waypoints").record(waypoints as f64);
}

/// Total walking distance of a planned route, in metres.
pub fn record_route_distance(metres: f64) {
    metrics::histogram!("walkroute_route_distance_metres").record(metres);
}
