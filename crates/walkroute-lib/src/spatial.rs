//! KD-tree index for snapping coordinates to graph nodes.
//!
//! Positions are stored as points on the unit sphere, so squared Euclidean
//! distance in the tree orders candidates exactly like great-circle distance.
//! The winning chord is converted back to metres for the snap check.

use std::collections::HashSet;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{chord_to_metres, Coordinate};
use crate::graph::{Graph, NodeId};
use crate::provider::NodeResolver;

/// Default distance beyond which a coordinate is not snapped to a node.
pub const DEFAULT_MAX_SNAP_DISTANCE_M: f64 = 250.0;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-node lookup over the positioned nodes of a graph.
pub struct NodeIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    ids: Vec<NodeId>,
    max_snap_distance_m: f64,
}

impl NodeIndex {
    /// Index every node of `graph` that carries a position.
    ///
    /// Nodes stacked on one exact position are indexed once, under the first
    /// node id in graph order. kiddo cannot split a bucket whose items all
    /// share a point.
    pub fn build(graph: &Graph) -> Self {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut ids = Vec::with_capacity(graph.node_count());
        let mut seen = HashSet::with_capacity(graph.node_count());
        let mut stacked = 0usize;

        for node in graph.nodes() {
            let Some(position) = node.position else {
                continue;
            };
            if !seen.insert(((position.lat + 0.0).to_bits(), (position.lng + 0.0).to_bits())) {
                stacked += 1;
                continue;
            }
            tree.add(&position.to_unit_vector(), ids.len());
            ids.push(node.id);
        }

        debug!(
            indexed = ids.len(),
            stacked,
            unpositioned = graph.node_count() - ids.len() - stacked,
            "built node index"
        );

        Self {
            tree,
            ids,
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
        }
    }

    pub fn with_max_distance(mut self, metres: f64) -> Self {
        self.max_snap_distance_m = metres;
        self
    }

    pub fn max_snap_distance_m(&self) -> f64 {
        self.max_snap_distance_m
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Closest indexed node and its distance in metres.
    pub fn nearest(&self, coordinate: Coordinate) -> Option<(NodeId, f64)> {
        if self.ids.is_empty() {
            return None;
        }
        let query = coordinate.to_unit_vector();
        let neighbour = self.tree.nearest_one::<SquaredEuclidean>(&query);
        let id = *self.ids.get(neighbour.item)?;
        Some((id, chord_to_metres(neighbour.distance.sqrt())))
    }
}

impl NodeResolver for NodeIndex {
    fn nearest_node(&self, coordinate: Coordinate) -> Result<NodeId> {
        coordinate.validate()?;
        match self.nearest(coordinate) {
            Some((id, distance)) if distance <= self.max_snap_distance_m => Ok(id),
            nearest => Err(Error::NodeResolution {
                lat: coordinate.lat,
                lng: coordinate.lng,
                nearest,
            }),
        }
    }
}
