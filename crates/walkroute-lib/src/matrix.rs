use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::{shortest_path, LegPath};

/// Role of a stop within a multi-stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKey {
    Start,
    Waypoint(usize),
    End,
}

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKey::Start => write!(f, "start"),
            StopKey::End => write!(f, "end"),
            StopKey::Waypoint(index) => write!(f, "waypoint {}", index),
        }
    }
}

/// Stops resolved to graph nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct StopSet {
    pub start: NodeId,
    pub end: NodeId,
    pub waypoints: Vec<NodeId>,
}

impl StopSet {
    pub fn new(start: NodeId, end: NodeId, waypoints: Vec<NodeId>) -> Self {
        Self {
            start,
            end,
            waypoints,
        }
    }

    pub fn node(&self, key: StopKey) -> Option<NodeId> {
        match key {
            StopKey::Start => Some(self.start),
            StopKey::End => Some(self.end),
            StopKey::Waypoint(index) => self.waypoints.get(index).copied(),
        }
    }

    /// Ordered pairs over `(Start ∪ W) × (W ∪ End)` with self-pairs removed.
    pub fn required_pairs(&self) -> Vec<(StopKey, StopKey)> {
        let waypoints = (0..self.waypoints.len()).map(StopKey::Waypoint);
        let origins: Vec<StopKey> = std::iter::once(StopKey::Start)
            .chain(waypoints.clone())
            .collect();
        let destinations: Vec<StopKey> = waypoints.chain(std::iter::once(StopKey::End)).collect();

        origins
            .iter()
            .flat_map(|&from| {
                destinations
                    .iter()
                    .filter(move |&&to| to != from)
                    .map(move |&to| (from, to))
            })
            .collect()
    }
}

/// Shortest-path results for every required ordered pair of stops.
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    entries: HashMap<(StopKey, StopKey), LegPath>,
}

impl DistanceMatrix {
    pub fn from_entries(entries: impl IntoIterator<Item = ((StopKey, StopKey), LegPath)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, from: StopKey, to: StopKey) -> Option<&LegPath> {
        self.entries.get(&(from, to))
    }

    /// Leg distance, `None` when the pair is unreachable or was never computed.
    pub fn distance(&self, from: StopKey, to: StopKey) -> Option<f64> {
        self.get(from, to).and_then(LegPath::distance)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unreachable_count(&self) -> usize {
        self.entries.values().filter(|leg| !leg.is_reachable()).count()
    }
}

/// Compute one shortest path per required pair of stops.
///
/// Pairs run on the rayon pool; each call only reads the shared graph. The
/// token is checked before every shortest-path call.
pub fn compute_distance_matrix(
    graph: &Graph,
    stops: &StopSet,
    cancel: &CancellationToken,
) -> Result<DistanceMatrix> {
    let pairs = stops.required_pairs();

    let entries = pairs
        .par_iter()
        .map(|&(from, to)| {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let source = stops
                .node(from)
                .ok_or_else(|| Error::invalid_input(format!("unknown stop {}", from)))?;
            let target = stops
                .node(to)
                .ok_or_else(|| Error::invalid_input(format!("unknown stop {}", to)))?;
            let leg = shortest_path(graph, source, target)?;
            Ok(((from, to), leg))
        })
        .collect::<Result<Vec<_>>>()?;

    let matrix = DistanceMatrix::from_entries(entries);
    tracing::debug!(
        pairs = matrix.len(),
        unreachable = matrix.unreachable_count(),
        "computed distance matrix"
    );
    Ok(matrix)
}
