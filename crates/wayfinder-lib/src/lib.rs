//! Wayfinder library entry points.
//!
//! This crate loads an indoor building graph, overlays live per-edge
//! conditions, and finds least-cost routes with a multi-criteria A* search
//! under hard mobility constraints. Higher-level consumers (CLI, services)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.

pub mod constraints;
pub mod cost;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod live;
pub mod path;
pub mod routing;

pub use constraints::{Rejection, RouteConstraints};
pub use cost::{edge_cost, CostBreakdown, Weights, BASE_SPEED_MPS, CROWD_TIME_FACTOR};
pub use dataset::{
    load_graph, load_graph_files, load_live_state, resolve_data_dir, DatasetPaths, DATA_DIR_ENV,
};
pub use error::{Endpoint, Error, Result};
pub use graph::{edge_id, reverse_edge_id, Edge, EdgeSpec, Graph, Node, NodeSpec, Position};
pub use heuristic::{estimate, V_MAX_MPS};
pub use live::{
    EdgeState, EdgeStatus, LiveStateProvider, LiveStateSnapshot, LiveStateStore, LiveStateUpdate,
    NoLiveState,
};
pub use routing::{plan_route, plan_route_with_cancel, RouteRequest, RouteResult};
