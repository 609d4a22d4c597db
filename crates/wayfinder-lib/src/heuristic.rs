//! Straight-line lower bound on remaining cost.

use crate::cost::Weights;
use crate::graph::{Graph, NodeIndex, Position};

/// Upper bound on effective walking speed (m/s). Must not be lower than
/// [`crate::cost::BASE_SPEED_MPS`] for the estimate to stay admissible.
pub const V_MAX_MPS: f64 = 1.6;

/// Estimate the remaining cost between two positions.
///
/// Crowd and risk cannot be known from geometry, so they contribute zero.
pub fn estimate_between(from: &Position, goal: &Position, weights: &Weights) -> f64 {
    let distance = from.distance_to(goal);
    let mut estimate = 0.0;
    if weights.time > 0.0 {
        estimate += weights.time * (distance / V_MAX_MPS);
    }
    if weights.distance > 0.0 {
        estimate += weights.distance * distance;
    }
    estimate
}

/// Estimate the remaining cost from `node` to `goal` by id; unknown nodes estimate zero.
pub fn estimate(graph: &Graph, node: &str, goal: &str, weights: &Weights) -> f64 {
    match (graph.position(node), graph.position(goal)) {
        (Some(from), Some(to)) => estimate_between(&from, &to, weights),
        _ => 0.0,
    }
}

pub(crate) fn estimate_index(
    graph: &Graph,
    node: NodeIndex,
    goal: NodeIndex,
    weights: &Weights,
) -> f64 {
    estimate_between(
        &graph.node(node).position,
        &graph.node(goal).position,
        weights,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::cost::edge_cost;
    use crate::graph::{EdgeSpec, NodeSpec};
    use crate::live::EdgeState;

    fn graph() -> Graph {
        Graph::build(
            BTreeMap::from([
                ("A".to_string(), NodeSpec::at(Position::new(0.0, 0.0, 0.0))),
                ("B".to_string(), NodeSpec::at(Position::new(8.0, 0.0, 0.0))),
                ("C".to_string(), NodeSpec::at(Position::new(8.0, 6.0, 0.0))),
            ]),
            &[EdgeSpec::new("A", "B"), EdgeSpec::new("B", "C")],
        )
    }

    #[test]
    fn max_speed_bounds_base_speed() {
        assert!(V_MAX_MPS >= crate::cost::BASE_SPEED_MPS);
    }

    #[test]
    fn crowd_and_risk_contribute_nothing() {
        let weights = Weights {
            crowd: 10.0,
            risk: 10.0,
            ..Weights::default()
        };
        assert_eq!(estimate(&graph(), "A", "C", &weights), 0.0);
    }

    #[test]
    fn combines_time_and_distance() {
        let weights = Weights {
            time: 1.0,
            distance: 2.0,
            ..Weights::default()
        };
        let h = estimate(&graph(), "A", "C", &weights);
        assert!((h - (10.0 / V_MAX_MPS + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn unknown_nodes_estimate_zero() {
        assert_eq!(estimate(&graph(), "A", "Z", &Weights::distance()), 0.0);
    }

    #[test]
    fn estimate_is_consistent_across_every_edge() {
        let graph = graph();
        let weights = Weights {
            time: 0.7,
            distance: 1.3,
            ..Weights::default()
        };
        let goal = graph.node_index("C").unwrap();
        for edge in graph.edges() {
            let cost = edge_cost(edge, &EdgeState::default(), &weights);
            let h_source = estimate_index(&graph, edge.source, goal, &weights);
            let h_target = estimate_index(&graph, edge.target, goal, &weights);
            assert!(h_source <= cost + h_target + 1e-9, "edge {} breaks consistency", edge.id);
        }
    }
}
