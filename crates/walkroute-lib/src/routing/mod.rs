//! Multi-stop walking route planning.
//!
//! This module provides:
//! - [`RouteOptions`] - Tunables shared by every entry point
//! - [`WalkRequest`] - Start, end and waypoints as coordinates
//! - [`RoutePlan`] - Planned route result
//! - [`compute_multi_stop_route`] - Plan over an already-built graph
//! - [`plan_walk`] - Full pipeline: region sizing, graph fetch, planning
//!
//! # Strategy Pattern
//!
//! Waypoint ordering goes through the [`Sequencer`] trait. Both provided
//! sequencers are exact and return identical plans; they only differ in how
//! the enumeration is scheduled.
//!
//! # Example
//!
//! ```no_run
//! use walkroute_lib::{plan_walk, Coordinate, OverpassProvider, RouteOptions, WalkRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = WalkRequest::new(
//!     Coordinate::new(41.0082, 28.9784),
//!     Coordinate::new(41.0256, 28.9744),
//!     vec![Coordinate::new(41.0115, 28.9833)],
//! );
//! let plan = plan_walk(&OverpassProvider::from_env(), &request, &RouteOptions::default())?;
//! println!("{:.0} m over {} points", plan.distance, plan.route.len());
//! # Ok(())
//! # }
//! ```

mod sequencer;

pub use sequencer::{
    select_sequencer, ExhaustiveSequencer, ParallelSequencer, Sequence, Sequencer, SequencerKind,
};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{build_graph, Graph, NodeId};
use crate::matrix::{compute_distance_matrix, StopKey, StopSet};
use crate::provider::{GraphProvider, NodeResolver};
use crate::region::{compute_center_and_radius, RegionConfig};
use crate::spatial::{NodeIndex, DEFAULT_MAX_SNAP_DISTANCE_M};
use crate::stitch::{stitch_legs, to_coordinates};

/// Largest waypoint count accepted by default. Exhaustive search is factorial.
pub const DEFAULT_MAX_WAYPOINTS: usize = 10;

/// Tunables for route planning.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub max_waypoints: usize,
    pub max_snap_distance_m: f64,
    /// Spread waypoint enumeration across the rayon pool.
    pub parallel: bool,
    pub region: RegionConfig,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
            parallel: false,
            region: RegionConfig::default(),
        }
    }
}

impl RouteOptions {
    pub fn sequencer_kind(&self) -> SequencerKind {
        if self.parallel {
            SequencerKind::Parallel
        } else {
            SequencerKind::Exhaustive
        }
    }
}

/// Coordinates of a multi-stop walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub waypoints: Vec<Coordinate>,
}

impl WalkRequest {
    pub fn new(start: Coordinate, end: Coordinate, waypoints: Vec<Coordinate>) -> Self {
        Self {
            start,
            end,
            waypoints,
        }
    }

    /// Start, waypoints, then end.
    pub fn points(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(self.start);
        points.extend_from_slice(&self.waypoints);
        points.push(self.end);
        points
    }
}

/// Planned route result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Total length, in the unit of the edge weights.
    pub distance: f64,
    /// Stop visiting order, `Start` first and `End` last.
    pub order: Vec<StopKey>,
    /// Stitched node sequence.
    #[serde(skip)]
    pub nodes: Vec<NodeId>,
    /// Node positions along the route; unpositioned nodes are omitted.
    pub route: Vec<Coordinate>,
    #[serde(skip)]
    pub orderings_evaluated: u64,
    #[serde(skip)]
    pub orderings_pruned: u64,
}

impl RoutePlan {
    /// Waypoint indices in visiting order.
    pub fn waypoint_order(&self) -> Vec<usize> {
        self.order
            .iter()
            .filter_map(|key| match key {
                StopKey::Waypoint(index) => Some(*index),
                _ => None,
            })
            .collect()
    }
}

fn check_waypoint_count(count: usize, options: &RouteOptions) -> Result<()> {
    if count > options.max_waypoints {
        return Err(Error::invalid_input(format!(
            "{} waypoints requested but at most {} are supported",
            count, options.max_waypoints
        )));
    }
    Ok(())
}

/// Plan the shortest walk from `start` through every waypoint to `end` over
/// an existing graph.
pub fn compute_multi_stop_route(
    graph: &Graph,
    resolver: &dyn NodeResolver,
    start: Coordinate,
    end: Coordinate,
    waypoints: &[Coordinate],
    options: &RouteOptions,
) -> Result<RoutePlan> {
    compute_multi_stop_route_with_cancel(
        graph,
        resolver,
        start,
        end,
        waypoints,
        options,
        &CancellationToken::new(),
    )
}

/// [`compute_multi_stop_route`] that stops early once `cancel` fires.
pub fn compute_multi_stop_route_with_cancel(
    graph: &Graph,
    resolver: &dyn NodeResolver,
    start: Coordinate,
    end: Coordinate,
    waypoints: &[Coordinate],
    options: &RouteOptions,
    cancel: &CancellationToken,
) -> Result<RoutePlan> {
    check_waypoint_count(waypoints.len(), options)?;

    let stops = StopSet::new(
        resolver.nearest_node(start)?,
        resolver.nearest_node(end)?,
        waypoints
            .iter()
            .map(|&waypoint| resolver.nearest_node(waypoint))
            .collect::<Result<Vec<_>>>()?,
    );

    let matrix = compute_distance_matrix(graph, &stops, cancel)?;
    let sequence = select_sequencer(options.sequencer_kind()).sequence(
        &matrix,
        stops.waypoints.len(),
        cancel,
    )?;

    let nodes = stitch_legs(&sequence.order, &matrix)?;
    let route = to_coordinates(graph, &nodes);

    Ok(RoutePlan {
        distance: sequence.total,
        order: sequence.order,
        nodes,
        route,
        orderings_evaluated: sequence.evaluated,
        orderings_pruned: sequence.pruned,
    })
}

/// Run the whole pipeline for a request: size the region, fetch and build
/// the graph, snap the stops and plan the route.
pub fn plan_walk(
    provider: &dyn GraphProvider,
    request: &WalkRequest,
    options: &RouteOptions,
) -> Result<RoutePlan> {
    plan_walk_with_cancel(provider, request, options, &CancellationToken::new())
}

/// [`plan_walk`] that stops early once `cancel` fires.
pub fn plan_walk_with_cancel(
    provider: &dyn GraphProvider,
    request: &WalkRequest,
    options: &RouteOptions,
    cancel: &CancellationToken,
) -> Result<RoutePlan> {
    // 1. Validate input before touching the network.
    check_waypoint_count(request.waypoints.len(), options)?;
    let points = request.points();
    for point in &points {
        point.validate()?;
    }

    // 2. Size the region around every stop.
    let region = compute_center_and_radius(&points, &options.region)?;
    info!(
        lat = region.center.lat,
        lng = region.center.lng,
        radius_m = region.radius_m,
        waypoints = request.waypoints.len(),
        "sized region"
    );

    // 3. Fetch and build the street graph.
    let data = provider.fetch(region.center, region.radius_m)?;
    let graph = build_graph(&data.nodes, &data.edges)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built graph"
    );

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    // 4. Snap stops and plan.
    let index = NodeIndex::build(&graph).with_max_distance(options.max_snap_distance_m);
    let plan = compute_multi_stop_route_with_cancel(
        &graph,
        &index,
        request.start,
        request.end,
        &request.waypoints,
        options,
        cancel,
    )?;
    info!(
        distance = plan.distance,
        points = plan.route.len(),
        evaluated = plan.orderings_evaluated,
        pruned = plan.orderings_pruned,
        sequencer = %options.sequencer_kind(),
        "planned route"
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, RawEdge};
    use crate::provider::{NetworkData, StaticProvider};

    /// Resolver that maps coordinates to nodes by exact latitude.
    struct ByLatitude(Vec<(f64, NodeId)>);

    impl NodeResolver for ByLatitude {
        fn nearest_node(&self, coordinate: Coordinate) -> Result<NodeId> {
            self.0
                .iter()
                .find(|(lat, _)| *lat == coordinate.lat)
                .map(|(_, id)| *id)
                .ok_or(Error::NodeResolution {
                    lat: coordinate.lat,
                    lng: coordinate.lng,
                    nearest: None,
                })
        }
    }

    fn corridor() -> NetworkData {
        // 1 - 2 - 3 - 4 along a meridian, walkable both ways.
        let nodes: Vec<Node> = (1..=4)
            .map(|id| Node::new(id, 41.0 + id as f64 * 0.001, 29.0))
            .collect();
        let mut edges = Vec::new();
        for id in 1..4 {
            edges.push(RawEdge::new(id, id + 1, 100.0));
            edges.push(RawEdge::new(id + 1, id, 100.0));
        }
        NetworkData::new(nodes, edges)
    }

    fn at(id: i64) -> Coordinate {
        Coordinate::new(41.0 + id as f64 * 0.001, 29.0)
    }

    #[test]
    fn plans_over_injected_resolver() {
        let data = corridor();
        let graph = build_graph(&data.nodes, &data.edges).unwrap();
        let resolver = ByLatitude((1..=4).map(|id| (at(id).lat, id)).collect());

        let plan = compute_multi_stop_route(
            &graph,
            &resolver,
            at(1),
            at(2),
            &[at(4), at(3)],
            &RouteOptions::default(),
        )
        .unwrap();

        // Both orderings cost 500; the first one enumerated is kept.
        assert_eq!(plan.waypoint_order(), vec![0, 1]);
        assert_eq!(plan.nodes, vec![1, 2, 3, 4, 3, 2]);
        assert_eq!(plan.distance, 500.0);
        assert_eq!(plan.route.len(), plan.nodes.len());
    }

    #[test]
    fn too_many_waypoints_are_rejected() {
        let options = RouteOptions {
            max_waypoints: 1,
            ..RouteOptions::default()
        };
        let request = WalkRequest::new(at(1), at(4), vec![at(2), at(3)]);
        let error = plan_walk(&StaticProvider::new(corridor()), &request, &options).unwrap_err();
        assert!(matches!(error, Error::InvalidInput { .. }));
    }

    #[test]
    fn plan_walk_runs_full_pipeline() {
        let request = WalkRequest::new(at(1), at(4), vec![at(3)]);
        let plan = plan_walk(
            &StaticProvider::new(corridor()),
            &request,
            &RouteOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.nodes, vec![1, 2, 3, 4]);
        assert_eq!(plan.distance, 300.0);
        assert_eq!(
            plan.order,
            vec![StopKey::Start, StopKey::Waypoint(0), StopKey::End]
        );
    }

    #[test]
    fn parallel_option_gives_same_plan() {
        let request = WalkRequest::new(at(1), at(1), vec![at(4), at(2), at(3)]);
        let provider = StaticProvider::new(corridor());
        let sequential = plan_walk(&provider, &request, &RouteOptions::default()).unwrap();
        let parallel = plan_walk(
            &provider,
            &request,
            &RouteOptions {
                parallel: true,
                ..RouteOptions::default()
            },
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn cancelled_pipeline_reports_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let request = WalkRequest::new(at(1), at(4), vec![]);
        let error = plan_walk_with_cancel(
            &StaticProvider::new(corridor()),
            &request,
            &RouteOptions::default(),
            &token,
        )
        .unwrap_err();
        assert!(matches!(error, Error::Cancelled));
    }

    #[test]
    fn serialized_plan_exposes_distance_route_and_order() {
        let request = WalkRequest::new(at(1), at(2), vec![]);
        let plan = plan_walk(
            &StaticProvider::new(corridor()),
            &request,
            &RouteOptions::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["distance"], 100.0);
        assert_eq!(json["route"][0]["lat"], at(1).lat);
        assert_eq!(json["order"][0], "start");
        assert!(json.get("nodes").is_none());
    }
}
