use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Outcome of a single shortest-path query.
///
/// Unreachability is ordinary data, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LegPath {
    Reachable { distance: f64, path: Vec<NodeId> },
    Unreachable,
}

impl LegPath {
    pub fn is_reachable(&self) -> bool {
        matches!(self, LegPath::Reachable { .. })
    }

    pub fn distance(&self) -> Option<f64> {
        match self {
            LegPath::Reachable { distance, .. } => Some(*distance),
            LegPath::Unreachable => None,
        }
    }

    /// Node sequence of the leg; empty when unreachable.
    pub fn path(&self) -> &[NodeId] {
        match self {
            LegPath::Reachable { path, .. } => path,
            LegPath::Unreachable => &[],
        }
    }
}

/// Run Dijkstra's algorithm from `source` until `target` is settled.
///
/// Frontier entries are ordered by tentative distance, then by insertion
/// sequence, so equal-distance candidates are extracted in the order they were
/// pushed and repeated runs always return the same path.
pub fn shortest_path(graph: &Graph, source: NodeId, target: NodeId) -> Result<LegPath> {
    let source_index = graph
        .index_of(source)
        .ok_or_else(|| Error::invalid_input(format!("source node {} is not in the graph", source)))?;
    let target_index = graph
        .index_of(target)
        .ok_or_else(|| Error::invalid_input(format!("target node {} is not in the graph", target)))?;

    if source_index == target_index {
        return Ok(LegPath::Reachable {
            distance: 0.0,
            path: vec![source],
        });
    }

    let node_count = graph.node_count();
    let mut distances = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<usize>> = vec![None; node_count];
    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;

    distances[source_index] = 0.0;
    queue.push(QueueEntry::new(source_index, 0.0, sequence));

    while let Some(entry) = queue.pop() {
        let current_distance = distances[entry.node];
        if entry.cost.0 > current_distance {
            continue;
        }

        if entry.node == target_index {
            break;
        }

        for edge in graph.neighbours(entry.node) {
            let next_cost = current_distance + edge.weight;
            if next_cost < distances[edge.target] {
                distances[edge.target] = next_cost;
                predecessors[edge.target] = Some(entry.node);
                sequence += 1;
                queue.push(QueueEntry::new(edge.target, next_cost, sequence));
            }
        }
    }

    if distances[target_index].is_infinite() {
        return Ok(LegPath::Unreachable);
    }

    match reconstruct_path(graph, &predecessors, source_index, target_index) {
        Some(path) => Ok(LegPath::Reachable {
            distance: distances[target_index],
            path,
        }),
        None => Ok(LegPath::Unreachable),
    }
}

fn reconstruct_path(
    graph: &Graph,
    predecessors: &[Option<usize>],
    source: usize,
    target: usize,
) -> Option<Vec<NodeId>> {
    let mut path = vec![graph.node_at(target).id];
    let mut current = target;
    while current != source {
        current = predecessors[current]?;
        path.push(graph.node_at(current).id);
    }
    path.reverse();
    Some(path)
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: usize,
    cost: FloatOrd,
    sequence: u64,
}

impl QueueEntry {
    fn new(node: usize, cost: f64, sequence: u64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            sequence,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by (cost, sequence).
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
