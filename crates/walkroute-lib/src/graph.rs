use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Identifier of a street-network node as supplied by the data provider.
pub type NodeId = i64;

/// Weight used when an edge arrives without a length.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Street-network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Absent for nodes that were only referenced by an edge.
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coordinate>,
}

impl Node {
    pub fn new(id: NodeId, lat: f64, lng: f64) -> Self {
        Self {
            id,
            position: Some(Coordinate::new(lat, lng)),
        }
    }
}

/// Directed edge as delivered by the graph provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl RawEdge {
    pub fn new(from: NodeId, to: NodeId, weight: f64) -> Self {
        Self {
            from,
            to,
            weight: Some(weight),
        }
    }

    pub fn unweighted(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            weight: None,
        }
    }
}

/// Outgoing edge inside the arena graph. `target` indexes [`Graph::node_at`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: usize,
    pub weight: f64,
}

/// Immutable street graph: a node arena plus index-based adjacency lists.
///
/// Cloning is cheap; the arena is shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: Arc<GraphInner>,
}

#[derive(Debug, Default)]
struct GraphInner {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.inner.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.index.contains_key(&id)
    }

    /// Arena slot of a node identifier.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.inner.index.get(&id).copied()
    }

    pub fn node_at(&self, index: usize) -> &Node {
        &self.inner.nodes[index]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|index| self.node_at(index))
    }

    pub fn position(&self, id: NodeId) -> Option<Coordinate> {
        self.node(id).and_then(|node| node.position)
    }

    /// Outgoing edges of the node at `index`. Nodes without outgoing edges
    /// yield an empty slice.
    pub fn neighbours(&self, index: usize) -> &[Edge] {
        self.inner
            .adjacency
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Outgoing edges of a node by identifier, as `(neighbour id, weight)`.
    pub fn neighbours_of(&self, id: NodeId) -> Vec<(NodeId, f64)> {
        self.index_of(id)
            .map(|index| {
                self.neighbours(index)
                    .iter()
                    .map(|edge| (self.node_at(edge.target).id, edge.weight))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Build the routing graph from a node table and a directed edge list.
///
/// Every edge is appended to its source's neighbour list in input order;
/// parallel edges are kept. Missing weights default to
/// [`DEFAULT_EDGE_WEIGHT`]. Endpoints absent from the node table are
/// registered without a position.
pub fn build_graph(nodes: &[Node], edges: &[RawEdge]) -> Result<Graph> {
    let mut inner = GraphInner {
        nodes: Vec::with_capacity(nodes.len()),
        index: HashMap::with_capacity(nodes.len()),
        adjacency: Vec::with_capacity(nodes.len()),
        edge_count: 0,
    };

    for node in nodes {
        if inner.index.contains_key(&node.id) {
            continue;
        }
        inner.register(node.clone());
    }

    for edge in edges {
        let weight = edge.weight.unwrap_or(DEFAULT_EDGE_WEIGHT);
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::invalid_input(format!(
                "edge {} -> {} has invalid weight {}",
                edge.from, edge.to, weight
            )));
        }

        let source = inner.slot(edge.from);
        let target = inner.slot(edge.to);
        inner.adjacency[source].push(Edge { target, weight });
        inner.edge_count += 1;
    }

    tracing::debug!(
        nodes = inner.nodes.len(),
        edges = inner.edge_count,
        "built street graph"
    );

    Ok(Graph {
        inner: Arc::new(inner),
    })
}

impl GraphInner {
    fn register(&mut self, node: Node) -> usize {
        let index = self.nodes.len();
        self.index.insert(node.id, index);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        index
    }

    fn slot(&mut self, id: NodeId) -> usize {
        match self.index.get(&id) {
            Some(&index) => index,
            None => self.register(Node { id, position: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Node> {
        vec![
            Node::new(1, 41.0, 29.0),
            Node::new(2, 41.001, 29.0),
            Node::new(3, 41.002, 29.0),
        ]
    }

    #[test]
    fn absent_weight_defaults_to_one() {
        let graph = build_graph(&table(), &[RawEdge::unweighted(1, 2)]).unwrap();
        assert_eq!(graph.neighbours_of(1), vec![(2, 1.0)]);
    }

    #[test]
    fn parallel_edges_are_preserved_in_order() {
        let edges = [RawEdge::new(1, 2, 5.0), RawEdge::new(1, 2, 3.0)];
        let graph = build_graph(&table(), &edges).unwrap();
        assert_eq!(graph.neighbours_of(1), vec![(2, 5.0), (2, 3.0)]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn sink_nodes_have_no_neighbours() {
        let graph = build_graph(&table(), &[RawEdge::new(1, 2, 1.0)]).unwrap();
        assert!(graph.neighbours_of(2).is_empty());
        assert!(graph.neighbours_of(3).is_empty());
        assert!(graph.neighbours_of(99).is_empty());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let error = build_graph(&table(), &[RawEdge::new(1, 2, -0.5)]).unwrap_err();
        assert!(matches!(error, Error::InvalidInput { .. }));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let error = build_graph(&table(), &[RawEdge::new(1, 2, f64::NAN)]).unwrap_err();
        assert!(matches!(error, Error::InvalidInput { .. }));
    }

    #[test]
    fn unknown_endpoints_become_unpositioned_nodes() {
        let graph = build_graph(&table(), &[RawEdge::new(3, 7, 2.0)]).unwrap();
        assert!(graph.contains(7));
        assert_eq!(graph.position(7), None);
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn duplicate_node_rows_keep_first_position() {
        let mut nodes = table();
        nodes.push(Node::new(1, 0.0, 0.0));
        let graph = build_graph(&nodes, &[]).unwrap();
        assert_eq!(graph.position(1), Some(Coordinate::new(41.0, 29.0)));
        assert_eq!(graph.node_count(), 3);
    }
}
