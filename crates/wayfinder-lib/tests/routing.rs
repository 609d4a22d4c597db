mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use common::{building, detour_graph, two_floor_building};
use wayfinder_lib::{
    plan_route, plan_route_with_cancel, EdgeState, Endpoint, Error, LiveStateProvider,
    EdgeSpec, LiveStateStore, LiveStateUpdate, NoLiveState, RouteConstraints, RouteRequest,
    Weights,
};

fn distance_request(start: &str, goal: &str) -> RouteRequest {
    RouteRequest::new(start, goal).with_weights(Weights::distance())
}

fn blocked(ids: &[&str]) -> LiveStateUpdate {
    LiveStateUpdate::directed(
        ids.iter()
            .map(|id| (id.to_string(), EdgeState::blocked()))
            .collect(),
    )
}

#[test]
fn detour_example_follows_short_hops() {
    let graph = detour_graph();
    let result = plan_route(&graph, &NoLiveState, &distance_request("A", "D")).expect("route exists");

    assert_eq!(result.path_nodes, vec!["A", "B", "C", "D"]);
    assert_eq!(result.path_edges, vec!["A__B", "B__C", "C__D"]);
    assert_eq!(result.total_cost, 6.0);
}

#[test]
fn detour_example_reacts_to_live_blocking() {
    let graph = detour_graph();
    let live = LiveStateStore::new();
    let request = distance_request("A", "D");

    live.replace(blocked(&["B__C", "C__B"]));
    let result = plan_route(&graph, &live, &request).expect("detour exists");
    assert_eq!(result.path_nodes, vec!["A", "D"]);
    assert_eq!(result.path_edges, vec!["A__D"]);
    assert_eq!(result.total_cost, 10.0);

    live.replace(blocked(&["B__C", "C__B", "A__D", "D__A"]));
    let error = plan_route(&graph, &live, &request).expect_err("no connector left");
    assert!(error.is_no_path());
    assert!(format!("{error}").contains("no path found"));
}

#[test]
fn blocking_one_direction_leaves_the_other_usable() {
    let graph = detour_graph();
    let live = LiveStateStore::with_update(blocked(&["B__C"]));

    let forward = plan_route(&graph, &live, &distance_request("A", "D")).unwrap();
    assert_eq!(forward.path_edges, vec!["A__D"]);

    let backward = plan_route(&graph, &live, &distance_request("D", "A")).unwrap();
    assert_eq!(backward.path_edges, vec!["D__C", "C__B", "B__A"]);
}

#[test]
fn unknown_endpoints_fail_before_search() {
    let graph = detour_graph();

    let error = plan_route(&graph, &NoLiveState, &distance_request("Z", "D")).unwrap_err();
    assert!(matches!(
        error,
        Error::UnknownNode { endpoint: Endpoint::Start, ref id } if id == "Z"
    ));

    let error = plan_route(&graph, &NoLiveState, &distance_request("A", "Q")).unwrap_err();
    assert!(matches!(error, Error::UnknownNode { endpoint: Endpoint::Goal, .. }));
    assert_eq!(format!("{error}"), "unknown goal node: Q");
}

#[test]
fn start_equal_to_goal_is_free() {
    let graph = detour_graph();
    let result = plan_route(&graph, &NoLiveState, &distance_request("C", "C")).unwrap();
    assert_eq!(result.path_nodes, vec!["C"]);
    assert!(result.path_edges.is_empty());
    assert_eq!(result.total_cost, 0.0);
}

#[test]
fn avoid_stairs_takes_the_elevator() {
    let graph = two_floor_building();
    let unconstrained = plan_route(&graph, &NoLiveState, &distance_request("LOBBY", "OFFICE")).unwrap();
    assert!(unconstrained.path_edges.contains(&"ST1__ST2".to_string()));
    assert_eq!(unconstrained.total_cost, 44.0);

    let request = distance_request("LOBBY", "OFFICE").with_constraints(RouteConstraints {
        avoid_stairs: true,
        ..RouteConstraints::default()
    });
    let result = plan_route(&graph, &NoLiveState, &request).unwrap();
    assert_eq!(
        result.path_nodes,
        vec!["LOBBY", "HALL1", "ST1", "EL1", "EL2", "ST2", "HALL2", "OFFICE"]
    );
    for id in &result.path_edges {
        assert!(!graph.edge(id).unwrap().is_stairs(), "{id} is stairs");
    }
    assert_eq!(result.total_cost, 64.0);
}

#[test]
fn require_elevator_only_uses_accessible_edges() {
    let graph = two_floor_building();
    let request = distance_request("OFFICE", "LOBBY").with_constraints(RouteConstraints {
        require_elevator: true,
        ..RouteConstraints::default()
    });
    let result = plan_route(&graph, &NoLiveState, &request).unwrap();
    assert!(result.path_edges.contains(&"EL2__EL1".to_string()));
    for id in &result.path_edges {
        assert!(graph.edge(id).unwrap().accessible, "{id} is not accessible");
    }
}

#[test]
fn require_elevator_fails_when_lift_is_closed() {
    let graph = two_floor_building();
    let live = LiveStateStore::with_update(LiveStateUpdate::new(HashMap::from([(
        "EL1__EL2".to_string(),
        EdgeState::blocked(),
    )])));
    let request = distance_request("LOBBY", "OFFICE").with_constraints(RouteConstraints {
        require_elevator: true,
        ..RouteConstraints::default()
    });
    let error = plan_route(&graph, &live, &request).unwrap_err();
    assert!(error.is_no_path());
}

#[test]
fn crowd_weight_steers_around_congestion() {
    let graph = two_floor_building();
    let live = LiveStateStore::with_update(LiveStateUpdate::new(HashMap::from([(
        "ST1__ST2".to_string(),
        EdgeState {
            crowd_level: 1.0,
            ..EdgeState::default()
        },
    )])));

    // Distance alone still prefers the crowded stairs.
    let plain = plan_route(&graph, &live, &distance_request("LOBBY", "OFFICE")).unwrap();
    assert!(plain.path_edges.contains(&"ST1__ST2".to_string()));

    let request = RouteRequest::new("LOBBY", "OFFICE").with_weights(Weights {
        distance: 1.0,
        crowd: 10.0,
        ..Weights::default()
    });
    let result = plan_route(&graph, &live, &request).unwrap();
    assert!(result.path_edges.contains(&"EL1__EL2".to_string()));
    assert_eq!(result.total_cost, 64.0);
}

#[test]
fn hazards_are_a_cost_not_a_gate() {
    let graph = detour_graph();
    let hazard = EdgeState {
        hazard_level: 1.0,
        ..EdgeState::default()
    };
    let live = LiveStateStore::with_update(LiveStateUpdate::new(HashMap::from([
        ("A__B".to_string(), hazard),
        ("B__C".to_string(), hazard),
        ("C__D".to_string(), hazard),
        ("A__D".to_string(), hazard),
    ])));
    let request = RouteRequest::new("A", "D").with_weights(Weights {
        risk: 1.0,
        ..Weights::default()
    });
    let result = plan_route(&graph, &live, &request).expect("hazards never block");
    assert_eq!(result.path_edges, vec!["A__B", "B__C", "C__D"]);
    assert_eq!(result.total_cost, 6.0);
}

#[test]
fn negative_weights_are_treated_as_zero() {
    let graph = detour_graph();
    let request = RouteRequest::new("A", "D").with_weights(Weights {
        distance: 1.0,
        time: -5.0,
        ..Weights::default()
    });
    let result = plan_route(&graph, &NoLiveState, &request).unwrap();
    assert_eq!(result.total_cost, 6.0);
}

#[test]
fn infinite_weights_never_produce_nan_costs() {
    let graph = building(
        &[("A", [1.0, 1.0, 0.0]), ("B", [1.0, 1.0, 0.0])],
        &[EdgeSpec::new("A", "B")],
    );
    let request = RouteRequest::new("A", "B").with_weights(Weights {
        time: f64::INFINITY,
        ..Weights::default()
    });
    let result = plan_route(&graph, &NoLiveState, &request).unwrap();
    assert_eq!(result.path_nodes, ["A", "B"]);
    assert_eq!(result.total_cost, 0.0);
}

#[test]
fn identical_inputs_give_identical_results() {
    let graph = two_floor_building();
    let live = LiveStateStore::with_update(LiveStateUpdate::new(HashMap::from([(
        "HALL1__ST1".to_string(),
        EdgeState {
            crowd_level: 0.3,
            speed_factor: 1.7,
            hazard_level: 0.2,
            ..EdgeState::default()
        },
    )])));
    let request = RouteRequest::new("LOBBY", "OFFICE").with_weights(Weights {
        time: 1.0,
        distance: 0.5,
        crowd: 2.0,
        risk: 3.0,
    });

    let first = plan_route(&graph, &live, &request).unwrap();
    for _ in 0..20 {
        let again = plan_route(&graph, &live, &request).unwrap();
        assert_eq!(again.path_nodes, first.path_nodes);
        assert_eq!(again.path_edges, first.path_edges);
        assert_eq!(again.total_cost.to_bits(), first.total_cost.to_bits());
    }
}

#[test]
fn zero_weights_still_enforce_constraints() {
    let graph = two_floor_building();
    let request = RouteRequest::new("LOBBY", "OFFICE").with_constraints(RouteConstraints {
        avoid_stairs: true,
        ..RouteConstraints::default()
    });
    let result = plan_route(&graph, &NoLiveState, &request).unwrap();
    assert_eq!(result.total_cost, 0.0);
    assert!(result.path_edges.iter().all(|id| !graph.edge(id).unwrap().is_stairs()));
}

#[test]
fn cancelled_search_reports_cancellation() {
    let graph = two_floor_building();
    let error = plan_route_with_cancel(&graph, &NoLiveState, &distance_request("LOBBY", "OFFICE"), || true)
        .expect_err("cancelled immediately");
    assert!(matches!(error, Error::Cancelled { .. }));

    let mut budget = 3;
    let error = plan_route_with_cancel(&graph, &NoLiveState, &distance_request("LOBBY", "OFFICE"), || {
        budget -= 1;
        budget < 0
    })
    .expect_err("cancelled mid-search");
    assert!(matches!(error, Error::Cancelled { .. }));
}

#[test]
fn searches_run_while_state_is_replaced() {
    let graph = Arc::new(detour_graph());
    let live = Arc::new(LiveStateStore::new());
    let stop = Arc::new(AtomicBool::new(false));

    let updater = {
        let live = Arc::clone(&live);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut toggle = false;
            while !stop.load(Ordering::Relaxed) {
                let update = if toggle {
                    blocked(&["B__C", "C__B"])
                } else {
                    LiveStateUpdate::default()
                };
                live.replace(update);
                toggle = !toggle;
            }
        })
    };

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let live = Arc::clone(&live);
            thread::spawn(move || {
                for _ in 0..200 {
                    let result = plan_route(&*graph, &live, &distance_request("A", "D"))
                        .expect("A-D edge is never blocked");
                    assert!(result.total_cost == 6.0 || result.total_cost == 10.0);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker finished");
    }
    stop.store(true, Ordering::Relaxed);
    updater.join().expect("updater finished");

    assert!(live.graph_version() > 1);
    assert_eq!(live.edge_state("A__D"), EdgeState::default());
}
