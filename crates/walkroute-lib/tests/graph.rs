mod common;

use walkroute_lib::{build_graph, shortest_path, LegPath, Node, RawEdge};

use common::{grid_graph, grid_network, grid_node};

#[test]
fn grid_fixture_builds_expected_shape() {
    let graph = grid_graph();
    assert_eq!(graph.node_count(), 18);
    assert_eq!(graph.edge_count(), 50);

    // Corner nodes have two outgoing streets, inner nodes four.
    assert_eq!(graph.neighbours_of(grid_node(0, 0)).len(), 2);
    assert_eq!(graph.neighbours_of(grid_node(1, 1)).len(), 4);
}

#[test]
fn every_positioned_node_keeps_its_coordinates() {
    let data = grid_network();
    let graph = grid_graph();
    for node in &data.nodes {
        assert_eq!(graph.position(node.id), node.position);
    }
}

#[test]
fn grid_corner_to_corner_distance() {
    let graph = grid_graph();
    let leg = shortest_path(&graph, grid_node(0, 0), grid_node(3, 3)).expect("valid nodes");
    assert_eq!(leg.distance(), Some(540.0));
    // Six street segments means seven nodes.
    assert_eq!(leg.path().len(), 7);
    assert_eq!(leg.path().first(), Some(&grid_node(0, 0)));
    assert_eq!(leg.path().last(), Some(&grid_node(3, 3)));
}

#[test]
fn island_is_unreachable_from_grid() {
    let graph = grid_graph();
    let leg = shortest_path(&graph, grid_node(0, 0), 100).expect("valid nodes");
    assert_eq!(leg, LegPath::Unreachable);
}

#[test]
fn three_node_triangle_prefers_two_cheap_hops() {
    let nodes = [
        Node::new(1, 0.0, 0.0),
        Node::new(2, 0.0, 0.001),
        Node::new(3, 0.0, 0.002),
    ];
    let edges = [
        RawEdge::new(1, 2, 1.0),
        RawEdge::new(2, 3, 1.0),
        RawEdge::new(1, 3, 5.0),
    ];
    let graph = build_graph(&nodes, &edges).expect("graph builds");
    let leg = shortest_path(&graph, 1, 3).expect("valid nodes");
    assert_eq!(
        leg,
        LegPath::Reachable {
            distance: 2.0,
            path: vec![1, 2, 3]
        }
    );
}

#[test]
fn shortest_path_is_repeatable() {
    let graph = grid_graph();
    let first = shortest_path(&graph, grid_node(0, 0), grid_node(3, 3)).expect("valid nodes");
    for _ in 0..10 {
        let again = shortest_path(&graph, grid_node(0, 0), grid_node(3, 3)).expect("valid nodes");
        assert_eq!(first, again);
    }
}
