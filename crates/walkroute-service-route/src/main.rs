//! Multi-stop walking route HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /api/v1/route` - Plan a walk through a set of waypoints
//! - `GET /metrics` - Prometheus metrics endpoint (`METRICS_PATH` overrides)
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `WALKROUTE_GRAPH_PATH` - Serve a fixed network file instead of Overpass
//! - `WALKROUTE_OVERPASS_URL` - Overpass endpoint
//! - `WALKROUTE_MAX_WAYPOINTS` / `WALKROUTE_MAX_SNAP_DISTANCE_M` - Planner limits
//! - `RUST_LOG`, `LOG_FORMAT`, `METRICS_ENABLED` - Observability

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use walkroute_lib::{plan_walk_with_cancel, CancellationToken, Coordinate, RoutePlan, StopKey};
use walkroute_service_shared::{
    from_lib_error, health_live, health_ready, init_logging, init_metrics, metrics_handler,
    record_route_calculated, record_route_distance, record_route_failed, record_route_waypoints,
    AppState, LoggingConfig, MetricsConfig, MetricsLayer, ProblemDetails, RequestId, RouteRequest,
    ServiceResponse, Validate,
};

/// Planned walk returned to the caller.
#[derive(Debug, Serialize)]
struct RouteResponse {
    /// Total walking distance in metres.
    distance: f64,
    /// Stops in visiting order.
    order: Vec<StopKey>,
    /// Waypoint indices in visiting order.
    waypoint_order: Vec<usize>,
    route: Vec<Coordinate>,
    orderings_evaluated: u64,
}

impl From<RoutePlan> for RouteResponse {
    fn from(plan: RoutePlan) -> Self {
        Self {
            waypoint_order: plan.waypoint_order(),
            distance: plan.distance,
            order: plan.order,
            route: plan.route,
            orderings_evaluated: plan.orderings_evaluated,
        }
    }
}

/// HTTP response - either success or RFC 9457 error.
enum Response {
    Success(ServiceResponse<RouteResponse>),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => data.into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service("walkroute-route"));

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "failed to configure application state");
        e
    })?;
    info!(source = state.source().label(), port, "starting route service");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");
    axum::serve(listener, app(state, &metrics_config.path)).await?;

    Ok(())
}

fn app(state: AppState, metrics_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/api/v1/route", post(route_handler))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle POST /api/v1/route requests.
async fn route_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id.to_string();

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_route_failed("invalid_input");
            return Response::Error(ProblemDetails::bad_request(
                rejection.body_text(),
                request_id,
            ));
        }
    };

    info!(
        request_id = %request_id,
        waypoints = request.waypoints.len(),
        parallel = request.parallel,
        "handling route request"
    );

    let mut options = state.options().clone();
    options.parallel = request.parallel;

    if let Err(problem) = request
        .validate(&request_id)
        .and_then(|()| request.check_waypoint_limit(options.max_waypoints, &request_id))
    {
        record_route_failed("invalid_input");
        return Response::Error(*problem);
    }

    let walk = request.to_walk_request();
    let provider = state.provider();
    let cancel = CancellationToken::new();
    // Dropping the handler (client went away) cancels the search.
    let guard = cancel.clone().drop_guard();
    let kind = options.sequencer_kind();

    let outcome = tokio::task::spawn_blocking(move || {
        plan_walk_with_cancel(provider.as_ref(), &walk, &options, &cancel)
    })
    .await;
    guard.disarm();

    let plan = match outcome {
        Ok(Ok(plan)) => plan,
        Ok(Err(e)) => {
            warn!(request_id = %request_id, error = %e, kind = e.kind(), "route planning failed");
            record_route_failed(e.kind());
            return Response::Error(from_lib_error(&e, &request_id));
        }
        Err(join_error) => {
            error!(request_id = %request_id, error = %join_error, "route planning task failed");
            record_route_failed("internal");
            return Response::Error(ProblemDetails::internal_error(
                "route planning task failed",
                request_id,
            ));
        }
    };

    record_route_calculated(&kind.to_string());
    record_route_waypoints(request.waypoints.len());
    record_route_distance(plan.distance);
    info!(
        request_id = %request_id,
        distance = plan.distance,
        points = plan.route.len(),
        evaluated = plan.orderings_evaluated,
        "route computed successfully"
    );

    Response::Success(ServiceResponse::new(RouteResponse::from(plan)).with_request_id(request_id))
}
