use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the walkroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised for malformed coordinates, negative weights, unknown nodes and
    /// other caller mistakes.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Raised when the external graph data source failed. Never retried.
    #[error("graph fetch failed: {message}")]
    GraphFetch { message: String },

    /// Raised when every waypoint ordering is infeasible or the direct
    /// start-to-end leg is unreachable.
    #[error("no route found: {reason}")]
    NoRouteFound { reason: String },

    /// Raised when a coordinate cannot be matched to a graph node close enough
    /// to be trusted.
    #[error(
        "no graph node near ({lat:.6}, {lng:.6}){}",
        format_nearest(.nearest)
    )]
    NodeResolution {
        lat: f64,
        lng: f64,
        nearest: Option<(NodeId, f64)>,
    },

    /// Raised when the caller cancelled the computation.
    #[error("route computation was cancelled")]
    Cancelled,

    /// Raised when a graph file could not be found.
    #[error("graph file not found at {path}")]
    GraphFileNotFound { path: PathBuf },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn graph_fetch(message: impl Into<String>) -> Self {
        Error::GraphFetch {
            message: message.into(),
        }
    }

    /// Stable machine-readable label for the error category.
    ///
    /// Used by adapters for problem types and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "invalid_input",
            Error::GraphFetch { .. } => "graph_fetch_error",
            Error::NoRouteFound { .. } => "no_route_found",
            Error::NodeResolution { .. } => "node_resolution_error",
            Error::Cancelled => "cancelled",
            Error::GraphFileNotFound { .. } | Error::Io(_) | Error::Json(_) => "internal",
        }
    }
}

fn format_nearest(nearest: &Option<(NodeId, f64)>) -> String {
    match nearest {
        Some((id, distance)) => format!("; closest node {} is {:.0} m away", id, distance),
        None => "; the graph has no positioned nodes".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_resolution_message_mentions_closest_node() {
        let error = Error::NodeResolution {
            lat: 41.0,
            lng: 29.0,
            nearest: Some((42, 812.4)),
        };
        let message = error.to_string();
        assert!(message.contains("closest node 42"));
        assert!(message.contains("812 m"));
        assert_eq!(error.kind(), "node_resolution_error");
    }

    #[test]
    fn node_resolution_message_without_candidates() {
        let error = Error::NodeResolution {
            lat: 0.0,
            lng: 0.0,
            nearest: None,
        };
        assert!(error.to_string().contains("no positioned nodes"));
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(Error::invalid_input("x").kind(), "invalid_input");
        assert_eq!(Error::graph_fetch("x").kind(), "graph_fetch_error");
        assert_eq!(
            Error::NoRouteFound {
                reason: "x".to_string()
            }
            .kind(),
            "no_route_found"
        );
        assert_eq!(Error::Cancelled.kind(), "cancelled");
    }
}
