//! Walkroute library entry points.
//!
//! This crate plans a single walking route that leaves a start point, visits
//! every waypoint in the cheapest order and finishes at an end point. Graph
//! acquisition and nearest-node lookup sit behind the [`GraphProvider`] and
//! [`NodeResolver`] traits; the CLI and HTTP service should only depend on
//! the functions exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod error;
pub mod geo;
pub mod graph;
pub mod matrix;
pub mod overpass;
pub mod path;
pub mod provider;
pub mod region;
pub mod routing;
pub mod spatial;
pub mod stitch;

pub use error::{Error, Result};
pub use geo::Coordinate;
pub use graph::{build_graph, Graph, Node, NodeId, RawEdge};
pub use matrix::{compute_distance_matrix, DistanceMatrix, StopKey, StopSet};
pub use overpass::OverpassProvider;
pub use path::{shortest_path, LegPath};
pub use provider::{FileProvider, GraphProvider, NetworkData, NodeResolver, StaticProvider};
pub use region::{compute_center_and_radius, Region, RegionConfig};
pub use routing::{
    compute_multi_stop_route, compute_multi_stop_route_with_cancel, plan_walk,
    plan_walk_with_cancel, select_sequencer, ExhaustiveSequencer, ParallelSequencer, RouteOptions,
    RoutePlan, Sequence, Sequencer, SequencerKind, WalkRequest,
};
pub use spatial::NodeIndex;
pub use stitch::{stitch_legs, to_coordinates};
pub use tokio_util::sync::CancellationToken;
