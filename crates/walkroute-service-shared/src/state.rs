//! Application state for HTTP microservices.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the graph provider and the route planning options.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use walkroute_lib::{
    FileProvider, GraphProvider, NetworkData, OverpassProvider, RouteOptions, StaticProvider,
};

const GRAPH_PATH_ENV: &str = "WALKROUTE_GRAPH_PATH";
const MAX_WAYPOINTS_ENV: &str = "WALKROUTE_MAX_WAYPOINTS";
const MAX_SNAP_DISTANCE_ENV: &str = "WALKROUTE_MAX_SNAP_DISTANCE_M";

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// `WALKROUTE_GRAPH_PATH` points at a file that does not exist.
    GraphFileNotFound(String),

    /// An environment variable holds a value that cannot be used.
    InvalidConfig { name: &'static str, value: String },
}

impl fmt::Display for AppStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GraphFileNotFound(path) => write!(f, "graph file not found: {}", path),
            Self::InvalidConfig { name, value } => {
                write!(f, "invalid value '{}' for {}", value, name)
            }
        }
    }
}

impl std::error::Error for AppStateError {}

/// Where the service gets its street network from.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    /// A JSON network file, re-read for every request.
    File(PathBuf),
    /// An Overpass API endpoint.
    Overpass(String),
    /// An in-memory network (tests, fixtures).
    Static,
}

impl GraphSource {
    /// Short label for logs and health responses.
    pub fn label(&self) -> &'static str {
        match self {
            GraphSource::File(_) => "file",
            GraphSource::Overpass(_) => "overpass",
            GraphSource::Static => "static",
        }
    }

    /// Whether requests can currently be served from this source.
    pub fn is_available(&self) -> bool {
        match self {
            GraphSource::File(path) => path.exists(),
            GraphSource::Overpass(_) | GraphSource::Static => true,
        }
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    provider: Arc<dyn GraphProvider>,
    source: GraphSource,
    options: RouteOptions,
}

impl AppState {
    /// Build state from environment variables.
    ///
    /// - `WALKROUTE_GRAPH_PATH`: serve this network file instead of Overpass
    /// - `WALKROUTE_OVERPASS_URL`: Overpass endpoint, read by
    ///   [`OverpassProvider::from_env`]
    /// - `WALKROUTE_MAX_WAYPOINTS`: waypoint cap (default 10)
    /// - `WALKROUTE_MAX_SNAP_DISTANCE_M`: snap threshold in metres (default 250)
    pub fn from_env() -> Result<Self, AppStateError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppStateError> {
        let mut options = RouteOptions::default();
        if let Some(raw) = var(MAX_WAYPOINTS_ENV) {
            options.max_waypoints =
                raw.trim()
                    .parse()
                    .map_err(|_| AppStateError::InvalidConfig {
                        name: MAX_WAYPOINTS_ENV,
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = var(MAX_SNAP_DISTANCE_ENV) {
            options.max_snap_distance_m = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|metres| metres.is_finite() && *metres >= 0.0)
                .ok_or_else(|| AppStateError::InvalidConfig {
                    name: MAX_SNAP_DISTANCE_ENV,
                    value: raw.clone(),
                })?;
        }

        let state = match var(GRAPH_PATH_ENV).filter(|path| !path.trim().is_empty()) {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(AppStateError::GraphFileNotFound(path.display().to_string()));
                }
                tracing::info!(path = %path.display(), "serving networks from file");
                Self::from_components(
                    Arc::new(FileProvider::new(&path)),
                    GraphSource::File(path),
                    options,
                )
            }
            None => {
                let provider = OverpassProvider::from_env();
                tracing::info!(endpoint = provider.endpoint(), "serving networks from overpass");
                let source = GraphSource::Overpass(provider.endpoint().to_string());
                Self::from_components(Arc::new(provider), source, options)
            }
        };

        tracing::info!(
            max_waypoints = state.options().max_waypoints,
            max_snap_distance_m = state.options().max_snap_distance_m,
            "route options configured"
        );
        Ok(state)
    }

    /// Create application state from pre-built components.
    pub fn from_components(
        provider: Arc<dyn GraphProvider>,
        source: GraphSource,
        options: RouteOptions,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                provider,
                source,
                options,
            }),
        }
    }

    /// State serving one in-memory network for every request.
    pub fn with_static_network(data: NetworkData, options: RouteOptions) -> Self {
        Self::from_components(
            Arc::new(StaticProvider::new(data)),
            GraphSource::Static,
            options,
        )
    }

    /// Shared handle to the graph provider, for moving into blocking tasks.
    pub fn provider(&self) -> Arc<dyn GraphProvider> {
        Arc::clone(&self.inner.provider)
    }

    pub fn source(&self) -> &GraphSource {
        &self.inner.source
    }

    pub fn options(&self) -> &RouteOptions {
        &self.inner.options
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("source", &self.inner.source)
            .field("max_waypoints", &self.inner.options.max_waypoints)
            .finish()
    }
}
