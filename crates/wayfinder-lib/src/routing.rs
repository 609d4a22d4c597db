//! Route planning entry points.
//!
//! This module provides:
//! - [`RouteRequest`] - start, goal, hard constraints and cost weights
//! - [`RouteResult`] - the optimal node/edge sequence and its total cost
//! - [`plan_route`] / [`plan_route_with_cancel`] - validate a request and run A*
//!
//! Live state is always passed in explicitly; the planner holds no shared
//! references between calls.
//!
//! # Example
//!
//! ```ignore
//! use wayfinder_lib::{plan_route, LiveStateStore, RouteRequest, Weights};
//!
//! let graph = wayfinder_lib::load_graph("data")?;
//! let live = LiveStateStore::new();
//! let request = RouteRequest::new("NM", "EX4").with_weights(Weights::time());
//! let result = plan_route(&graph, &live, &request)?;
//! println!("{} hops, cost {:.2}", result.hop_count(), result.total_cost);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constraints::RouteConstraints;
use crate::cost::Weights;
use crate::error::{Endpoint, Error, Result};
use crate::graph::{Graph, NodeIndex};
use crate::live::LiveStateProvider;
use crate::path::{find_route_a_star, SearchOutcome};

/// High-level route planning request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    #[serde(rename = "startNode", alias = "start")]
    pub start: String,
    #[serde(rename = "endNode", alias = "goal")]
    pub goal: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constraints: RouteConstraints,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weights: Weights,
}

/// Read an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RouteRequest {
    /// Request with no constraints and all weights zero.
    pub fn new(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            constraints: RouteConstraints::default(),
            weights: Weights::default(),
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_constraints(mut self, constraints: RouteConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Parse a JSON request body; shape errors become [`Error::InvalidRequest`].
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|err| Error::InvalidRequest {
            message: err.to_string(),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.start.is_empty() {
            return Err(Error::InvalidRequest {
                message: "start node is required".to_string(),
            });
        }
        if self.goal.is_empty() {
            return Err(Error::InvalidRequest {
                message: "end node is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Node ids from start to goal inclusive.
    pub path_nodes: Vec<String>,
    /// Directed edge ids, one per hop.
    pub path_edges: Vec<String>,
    pub total_cost: f64,
}

impl RouteResult {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.path_edges.len()
    }
}

fn resolve_node(graph: &Graph, id: &str, endpoint: Endpoint) -> Result<NodeIndex> {
    graph.node_index(id).ok_or_else(|| Error::UnknownNode {
        endpoint,
        id: id.to_string(),
    })
}

/// Compute the least-cost feasible route for `request`.
pub fn plan_route<P>(graph: &Graph, live: &P, request: &RouteRequest) -> Result<RouteResult>
where
    P: LiveStateProvider + ?Sized,
{
    plan_route_with_cancel(graph, live, request, || false)
}

/// Compute a route, aborting with [`Error::Cancelled`] once `cancelled`
/// returns `true`. The check runs before every frontier pop.
pub fn plan_route_with_cancel<P, C>(
    graph: &Graph,
    live: &P,
    request: &RouteRequest,
    cancelled: C,
) -> Result<RouteResult>
where
    P: LiveStateProvider + ?Sized,
    C: FnMut() -> bool,
{
    request.validate()?;
    let start = resolve_node(graph, &request.start, Endpoint::Start)?;
    let goal = resolve_node(graph, &request.goal, Endpoint::Goal)?;
    let weights = request.weights.sanitized();

    let outcome = find_route_a_star(
        graph,
        live,
        start,
        goal,
        &request.constraints,
        &weights,
        cancelled,
    );

    match outcome {
        SearchOutcome::Found(path) => {
            debug!(
                start = %request.start,
                goal = %request.goal,
                hops = path.edges.len(),
                expanded = path.expanded,
                total_cost = path.cost,
                "route found"
            );
            Ok(RouteResult {
                path_nodes: path
                    .nodes
                    .iter()
                    .map(|&node| graph.node(node).id.clone())
                    .collect(),
                path_edges: path
                    .edges
                    .iter()
                    .map(|&edge| graph.edge_at(edge).id.clone())
                    .collect(),
                total_cost: path.cost,
            })
        }
        SearchOutcome::Exhausted { expanded } => {
            debug!(start = %request.start, goal = %request.goal, expanded, "frontier exhausted");
            Err(Error::NoPath {
                start: request.start.clone(),
                goal: request.goal.clone(),
            })
        }
        SearchOutcome::Cancelled { expanded } => {
            debug!(start = %request.start, goal = %request.goal, expanded, "search cancelled");
            Err(Error::Cancelled {
                start: request.start.clone(),
                goal: request.goal.clone(),
            })
        }
    }
}
