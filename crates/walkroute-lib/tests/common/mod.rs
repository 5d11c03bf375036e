//! Common test utilities and fixture helpers.
//!
//! The grid fixture is a 4x4 block of streets. Node `row * 4 + col + 1` sits
//! at `(41.0 + row * 0.001, 29.0 + col * 0.001)`; east-west edges weigh 80
//! and north-south edges weigh 100, in both directions. Nodes 100 and 101
//! form an island that no grid node can reach.

use std::path::PathBuf;

use walkroute_lib::{build_graph, Coordinate, Graph, NetworkData, NodeId};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn grid_fixture_path() -> PathBuf {
    fixtures_dir().join("grid_walk.json")
}

#[allow(dead_code)]
pub fn grid_network() -> NetworkData {
    NetworkData::from_path(&grid_fixture_path()).expect("grid fixture loads")
}

#[allow(dead_code)]
pub fn grid_graph() -> Graph {
    let data = grid_network();
    build_graph(&data.nodes, &data.edges).expect("grid fixture builds")
}

/// Identifier of the grid node at `(row, col)`.
#[allow(dead_code)]
pub fn grid_node(row: i64, col: i64) -> NodeId {
    row * 4 + col + 1
}

/// Position of the grid node at `(row, col)`.
#[allow(dead_code)]
pub fn grid_point(row: i64, col: i64) -> Coordinate {
    Coordinate::new(41.0 + row as f64 * 0.001, 29.0 + col as f64 * 0.001)
}

#[allow(dead_code)]
pub fn island_point() -> Coordinate {
    Coordinate::new(41.0015, 29.0045)
}
