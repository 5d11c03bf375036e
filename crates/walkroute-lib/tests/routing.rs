mod common;

use walkroute_lib::{
    compute_distance_matrix, compute_multi_stop_route, plan_walk, shortest_path, stitch_legs,
    CancellationToken, Error, FileProvider, NodeIndex, RouteOptions, StaticProvider, StopKey,
    StopSet, WalkRequest,
};

use common::{grid_fixture_path, grid_graph, grid_network, grid_node, grid_point, island_point};

fn provider() -> FileProvider {
    FileProvider::new(grid_fixture_path())
}

#[test]
fn direct_walk_without_waypoints() {
    let request = WalkRequest::new(grid_point(0, 0), grid_point(3, 3), vec![]);
    let plan = plan_walk(&provider(), &request, &RouteOptions::default()).expect("route exists");

    assert_eq!(plan.distance, 540.0);
    assert_eq!(plan.order, vec![StopKey::Start, StopKey::End]);
    assert_eq!(plan.nodes.first(), Some(&grid_node(0, 0)));
    assert_eq!(plan.nodes.last(), Some(&grid_node(3, 3)));
    assert_eq!(plan.route.len(), plan.nodes.len());
}

#[test]
fn waypoints_are_reordered_to_minimise_distance() {
    // Visiting the south-east corner first costs 1020; the other way 1140.
    let request = WalkRequest::new(
        grid_point(0, 0),
        grid_point(3, 3),
        vec![grid_point(3, 0), grid_point(0, 3)],
    );
    let plan = plan_walk(&provider(), &request, &RouteOptions::default()).expect("route exists");

    assert_eq!(plan.distance, 1020.0);
    assert_eq!(plan.waypoint_order(), vec![1, 0]);
    assert_eq!(plan.orderings_evaluated, 2);
    assert_eq!(plan.nodes.first(), Some(&grid_node(0, 0)));
    assert_eq!(plan.nodes.last(), Some(&grid_node(3, 3)));
    assert!(plan.nodes.contains(&grid_node(0, 3)));
    assert!(plan.nodes.contains(&grid_node(3, 0)));
}

#[test]
fn unreachable_waypoint_means_no_route() {
    let request = WalkRequest::new(grid_point(0, 0), grid_point(3, 3), vec![island_point()]);
    let error = plan_walk(&provider(), &request, &RouteOptions::default()).unwrap_err();
    assert!(matches!(error, Error::NoRouteFound { .. }), "{error}");
}

#[test]
fn coordinates_far_from_the_network_fail_to_resolve() {
    let request = WalkRequest::new(
        grid_point(0, 0),
        walkroute_lib::Coordinate::new(41.05, 29.0),
        vec![],
    );
    let error = plan_walk(&provider(), &request, &RouteOptions::default()).unwrap_err();
    assert!(matches!(error, Error::NodeResolution { .. }), "{error}");
    assert_eq!(error.kind(), "node_resolution_error");
}

#[test]
fn invalid_coordinate_is_rejected_before_fetching() {
    let provider = FileProvider::new("/nowhere/graph.json");
    let request = WalkRequest::new(
        walkroute_lib::Coordinate::new(91.0, 0.0),
        grid_point(0, 0),
        vec![],
    );
    let error = plan_walk(&provider, &request, &RouteOptions::default()).unwrap_err();
    assert!(matches!(error, Error::InvalidInput { .. }));
}

#[test]
fn plans_are_identical_across_runs_and_sequencers() {
    let request = WalkRequest::new(
        grid_point(0, 0),
        grid_point(0, 0),
        vec![
            grid_point(1, 2),
            grid_point(3, 3),
            grid_point(2, 0),
            grid_point(0, 3),
        ],
    );
    let provider = StaticProvider::new(grid_network());
    let reference = plan_walk(&provider, &request, &RouteOptions::default()).expect("route");
    assert_eq!(reference.orderings_evaluated, 24);

    for _ in 0..5 {
        let again = plan_walk(&provider, &request, &RouteOptions::default()).expect("route");
        assert_eq!(again, reference);
    }

    let parallel = RouteOptions {
        parallel: true,
        ..RouteOptions::default()
    };
    let from_parallel = plan_walk(&provider, &request, &parallel).expect("route");
    assert_eq!(from_parallel, reference);
}

#[test]
fn stitched_length_matches_leg_lengths() {
    let graph = grid_graph();
    let index = NodeIndex::build(&graph);
    let waypoints = [grid_point(2, 1), grid_point(1, 3)];
    let plan = compute_multi_stop_route(
        &graph,
        &index,
        grid_point(0, 0),
        grid_point(3, 0),
        &waypoints,
        &RouteOptions::default(),
    )
    .expect("route exists");

    let stops = StopSet::new(
        grid_node(0, 0),
        grid_node(3, 0),
        vec![grid_node(2, 1), grid_node(1, 3)],
    );
    let matrix =
        compute_distance_matrix(&graph, &stops, &CancellationToken::new()).expect("matrix");
    let legs: usize = plan
        .order
        .windows(2)
        .map(|pair| matrix.get(pair[0], pair[1]).expect("pair present").path().len())
        .sum();
    assert_eq!(plan.nodes.len(), legs - (plan.order.len() - 2));
    assert_eq!(stitch_legs(&plan.order, &matrix).expect("stitch"), plan.nodes);

    // The stitched walk is a real path whose edge weights sum to the total.
    let mut walked = 0.0;
    for pair in plan.nodes.windows(2) {
        let step = shortest_path(&graph, pair[0], pair[1]).expect("valid nodes");
        walked += step.distance().expect("adjacent nodes are connected");
    }
    assert_eq!(walked, plan.distance);
}

#[test]
fn matrix_distances_satisfy_triangle_inequality() {
    let graph = grid_graph();
    let stops = StopSet::new(
        grid_node(0, 0),
        grid_node(3, 3),
        vec![grid_node(1, 1), grid_node(2, 3), grid_node(3, 0)],
    );
    let matrix =
        compute_distance_matrix(&graph, &stops, &CancellationToken::new()).expect("matrix");
    let keys: Vec<StopKey> = std::iter::once(StopKey::Start)
        .chain((0..3).map(StopKey::Waypoint))
        .chain(std::iter::once(StopKey::End))
        .collect();

    for &a in &keys {
        for &b in &keys {
            for &c in &keys {
                if let (Some(ab), Some(bc), Some(ac)) =
                    (matrix.distance(a, b), matrix.distance(b, c), matrix.distance(a, c))
                {
                    assert!(ac <= ab + bc, "{a} -> {c} is longer than via {b}");
                }
            }
        }
    }
}
