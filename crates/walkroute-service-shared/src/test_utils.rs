//! Test utilities for handler testing.
//!
//! Serves the 4x4 street grid from `docs/fixtures/grid_walk.json`.

use std::path::PathBuf;
use std::sync::OnceLock;

use walkroute_lib::{Coordinate, NetworkData, RouteOptions};

use crate::state::AppState;

pub const GRID_FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/grid_walk.json"
);

static GRID_NETWORK: OnceLock<NetworkData> = OnceLock::new();

pub fn fixture_path() -> PathBuf {
    PathBuf::from(GRID_FIXTURE_PATH)
}

/// The grid network, parsed once per test binary.
///
/// # Panics
///
/// Panics if the fixture cannot be read.
pub fn grid_network() -> NetworkData {
    GRID_NETWORK
        .get_or_init(|| {
            NetworkData::from_path(&fixture_path())
                .unwrap_or_else(|e| panic!("failed to load grid fixture: {}", e))
        })
        .clone()
}

/// State serving the grid fixture with default options.
pub fn test_state() -> AppState {
    test_state_with(RouteOptions::default())
}

pub fn test_state_with(options: RouteOptions) -> AppState {
    AppState::with_static_network(grid_network(), options)
}

/// Position of the grid node at `row`, `col` (both 0..4).
pub fn grid_point(row: usize, col: usize) -> Coordinate {
    Coordinate::new(41.0 + row as f64 * 0.001, 29.0 + col as f64 * 0.001)
}

/// A node on the two-node island disconnected from the grid.
pub fn island_point() -> Coordinate {
    Coordinate::new(41.0015, 29.0045)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_exists() {
        assert!(fixture_path().exists());
    }

    #[test]
    fn grid_has_island() {
        let network = grid_network();
        assert_eq!(network.nodes.len(), 18);
        assert!(network.nodes.iter().any(|node| node.id == 100));
    }

    #[test]
    fn state_uses_static_source() {
        assert_eq!(test_state().source().label(), "static");
    }
}
