//! Shared infrastructure for the walkroute HTTP microservices.
//!
//! - [`AppState`]: graph provider and route options shared by handlers
//! - [`health`]: liveness/readiness probe handlers
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`ServiceResponse`]: success bodies tagged with the request ID
//! - [`metrics`]: Prometheus recorder and business counters
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request IDs and HTTP metrics
//!
//! Handlers stay thin: parse, validate, call `walkroute-lib`, format.
//!
//! Enable the `test-utils` feature to use [`test_utils`] from other crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_route_calculated, record_route_distance,
    record_route_failed, record_route_waypoints, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_GRAPH_FETCH, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_NODE_RESOLUTION, PROBLEM_ROUTE_NOT_FOUND,
    PROBLEM_SERVICE_UNAVAILABLE,
};
pub use request::{RouteRequest, Validate};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError, GraphSource};
