use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{Graph, NodeId};
use crate::matrix::{DistanceMatrix, StopKey};

/// Concatenate the leg paths along `order` into one node sequence.
///
/// The first leg is taken whole; every later leg drops its first node, which
/// repeats the previous leg's last node.
pub fn stitch_legs(order: &[StopKey], matrix: &DistanceMatrix) -> Result<Vec<NodeId>> {
    let mut route = Vec::new();

    for (position, pair) in order.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let leg = matrix.get(from, to).filter(|leg| leg.is_reachable()).ok_or_else(|| {
            Error::NoRouteFound {
                reason: format!("no path from {} to {}", from, to),
            }
        })?;

        let nodes = leg.path();
        if position == 0 {
            route.extend_from_slice(nodes);
        } else {
            route.extend_from_slice(nodes.get(1..).unwrap_or_default());
        }
    }

    Ok(route)
}

/// Map node identifiers to coordinates, skipping nodes without a position.
pub fn to_coordinates(graph: &Graph, nodes: &[NodeId]) -> Vec<Coordinate> {
    nodes.iter().filter_map(|&id| graph.position(id)).collect()
}
