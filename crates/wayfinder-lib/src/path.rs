use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::constraints::RouteConstraints;
use crate::cost::{edge_cost, Weights};
use crate::graph::{EdgeIndex, Graph, NodeIndex};
use crate::heuristic::estimate_index;
use crate::live::LiveStateProvider;

/// Path found by the search, expressed as graph indices.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    pub cost: f64,
    /// Number of nodes closed before the goal was popped.
    pub expanded: usize,
}

/// Terminal state of a single search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(FoundPath),
    /// Frontier emptied before the goal was reached.
    Exhausted { expanded: usize },
    /// The cancellation check fired between frontier pops.
    Cancelled { expanded: usize },
}

/// Run A* from `start` to `goal`.
///
/// Live state is read once per examined edge through `live`. `cancelled` is
/// polled before every frontier pop; once it returns `true` the search stops
/// without producing a path.
pub fn find_route_a_star<P, C>(
    graph: &Graph,
    live: &P,
    start: NodeIndex,
    goal: NodeIndex,
    constraints: &RouteConstraints,
    weights: &Weights,
    mut cancelled: C,
) -> SearchOutcome
where
    P: LiveStateProvider + ?Sized,
    C: FnMut() -> bool,
{
    let node_count = graph.node_count();
    let mut g_score: Vec<Option<f64>> = vec![None; node_count];
    let mut closed = vec![false; node_count];
    let mut parents: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; node_count];
    let mut queue = BinaryHeap::new();
    let mut sequence: u64 = 0;
    let mut expanded = 0usize;

    g_score[start] = Some(0.0);
    queue.push(AStarEntry::new(
        start,
        estimate_index(graph, start, goal, weights),
        sequence,
    ));

    loop {
        if cancelled() {
            return SearchOutcome::Cancelled { expanded };
        }

        let Some(entry) = queue.pop() else {
            return SearchOutcome::Exhausted { expanded };
        };

        let current = entry.node;
        if closed[current] {
            // Stale duplicate of a node that was already finalised.
            continue;
        }

        let Some(current_score) = g_score[current] else {
            continue;
        };

        if current == goal {
            let (nodes, edges) = reconstruct_path(&parents, start, goal);
            return SearchOutcome::Found(FoundPath {
                nodes,
                edges,
                cost: current_score,
                expanded,
            });
        }

        closed[current] = true;
        expanded += 1;

        for &edge_index in graph.neighbours(current) {
            let edge = graph.edge_at(edge_index);
            let next = edge.target;
            let state = live.edge_state(&edge.id);

            if !constraints.admit(edge, &state) || closed[next] {
                continue;
            }

            let tentative_g = current_score + edge_cost(edge, &state, weights);
            let improves = match g_score[next] {
                Some(known) => tentative_g < known,
                None => true,
            };
            if !improves {
                continue;
            }

            g_score[next] = Some(tentative_g);
            parents[next] = Some((current, edge_index));
            sequence += 1;
            let heuristic = estimate_index(graph, next, goal, weights);
            queue.push(AStarEntry::new(next, tentative_g + heuristic, sequence));
        }
    }
}

fn reconstruct_path(
    parents: &[Option<(NodeIndex, EdgeIndex)>],
    start: NodeIndex,
    goal: NodeIndex,
) -> (Vec<NodeIndex>, Vec<EdgeIndex>) {
    let mut nodes = vec![goal];
    let mut edges = Vec::new();
    let mut current = goal;
    while current != start {
        let Some((previous, edge)) = parents[current] else {
            break;
        };
        edges.push(edge);
        nodes.push(previous);
        current = previous;
    }
    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
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
struct AStarEntry {
    estimate: FloatOrd,
    sequence: u64,
    node: NodeIndex,
}

impl AStarEntry {
    fn new(node: NodeIndex, estimate: f64, sequence: u64) -> Self {
        Self {
            estimate: FloatOrd(estimate),
            sequence,
            node,
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, oldest first.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
