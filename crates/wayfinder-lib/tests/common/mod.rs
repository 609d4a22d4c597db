#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wayfinder_lib::{
    edge_cost, EdgeSpec, Graph, LiveStateProvider, NodeSpec, Position, RouteConstraints, Weights,
};

/// Build a graph from `(id, [x, y, z])` pairs and undirected edges.
pub fn building(nodes: &[(&str, [f64; 3])], edges: &[EdgeSpec]) -> Graph {
    let nodes = nodes
        .iter()
        .map(|(id, pos)| (id.to_string(), NodeSpec::at(Position::from(*pos))))
        .collect::<BTreeMap<_, _>>();
    Graph::build(nodes, edges)
}

/// A-B, B-C, C-D each length 2 along a line; A-D a 10 m detour.
pub fn detour_graph() -> Graph {
    building(
        &[
            ("A", [0.0, 0.0, 0.0]),
            ("B", [2.0, 0.0, 0.0]),
            ("C", [4.0, 0.0, 0.0]),
            ("D", [6.0, 0.0, 0.0]),
        ],
        &[
            EdgeSpec::new("A", "B"),
            EdgeSpec::new("B", "C"),
            EdgeSpec::new("C", "D"),
            EdgeSpec::new("A", "D").length(10.0),
        ],
    )
}

/// Two floors joined by a staircase and an elevator.
///
/// ```text
///  floor 1:  LOBBY --- HALL1 --- ST1 --- EL1
///                                 |       |
///  floor 2:  OFFICE -- HALL2 --- ST2 --- EL2
/// ```
pub fn two_floor_building() -> Graph {
    building(
        &[
            ("LOBBY", [0.0, 0.0, 0.0]),
            ("HALL1", [10.0, 0.0, 0.0]),
            ("ST1", [20.0, 0.0, 0.0]),
            ("EL1", [30.0, 0.0, 0.0]),
            ("ST2", [20.0, 0.0, 4.0]),
            ("EL2", [30.0, 0.0, 4.0]),
            ("HALL2", [10.0, 0.0, 4.0]),
            ("OFFICE", [0.0, 0.0, 4.0]),
        ],
        &[
            EdgeSpec::new("LOBBY", "HALL1").accessible(true),
            EdgeSpec::new("HALL1", "ST1").accessible(true),
            EdgeSpec::new("ST1", "EL1").accessible(true),
            EdgeSpec::new("ST1", "ST2").kind("Stairs"),
            EdgeSpec::new("EL1", "EL2").kind("elevator").accessible(true),
            EdgeSpec::new("EL2", "ST2").accessible(true),
            EdgeSpec::new("ST2", "HALL2").accessible(true),
            EdgeSpec::new("HALL2", "OFFICE").accessible(true),
        ],
    )
}

/// Random connected-ish graph with `size` nodes inside a 100 m cube.
pub fn random_graph(rng: &mut SmallRng, size: usize) -> Graph {
    let kinds = ["corridor", "stairs", "elevator", "ramp"];
    let ids: Vec<String> = (0..size).map(|i| format!("N{i:02}")).collect();
    let nodes = ids
        .iter()
        .map(|id| {
            let pos = [
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..12.0),
            ];
            (id.clone(), NodeSpec::at(Position::from(pos)))
        })
        .collect::<BTreeMap<_, _>>();

    let mut edges = Vec::new();
    for i in 1..size {
        // Spanning chain keeps most pairs reachable before constraints apply.
        let j = rng.gen_range(0..i);
        edges.push(random_edge(rng, &ids[i], &ids[j], &kinds));
    }
    for _ in 0..size * 2 {
        let a = rng.gen_range(0..size);
        let b = rng.gen_range(0..size);
        if a != b {
            edges.push(random_edge(rng, &ids[a], &ids[b], &kinds));
        }
    }
    Graph::build(nodes, &edges)
}

fn random_edge(rng: &mut SmallRng, a: &str, b: &str, kinds: &[&str]) -> EdgeSpec {
    let mut spec = EdgeSpec::new(a, b)
        .kind(kinds[rng.gen_range(0..kinds.len())])
        .accessible(rng.gen_bool(0.7));
    if rng.gen_bool(0.2) {
        spec = spec.length(rng.gen_range(100.0..200.0));
    }
    spec
}

pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Exhaustive single-source shortest costs (Bellman-Ford style relaxation)
/// over admitted edges. Used as the reference for optimality checks.
pub fn brute_force_costs<P: LiveStateProvider>(
    graph: &Graph,
    live: &P,
    source: &str,
    constraints: &RouteConstraints,
    weights: &Weights,
) -> HashMap<String, f64> {
    let mut best: Vec<Option<f64>> = vec![None; graph.node_count()];
    best[graph.node_index(source).expect("source exists")] = Some(0.0);

    for _ in 0..graph.node_count() {
        let mut changed = false;
        for edge in graph.edges() {
            let state = live.edge_state(&edge.id);
            if !constraints.admit(edge, &state) {
                continue;
            }
            let Some(base) = best[edge.source] else {
                continue;
            };
            let candidate = base + edge_cost(edge, &state, weights);
            let better = match best[edge.target] {
                Some(known) => candidate.total_cmp(&known) == Ordering::Less,
                None => true,
            };
            if better {
                best[edge.target] = Some(candidate);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    graph
        .nodes()
        .zip(best)
        .filter_map(|(node, cost)| cost.map(|c| (node.id.clone(), c)))
        .collect()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
