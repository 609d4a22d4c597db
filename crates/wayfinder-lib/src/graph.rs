use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Separator between the source and target ids of a directed edge id.
pub const EDGE_ID_SEPARATOR: &str = "__";

/// Dense index of a node inside a [`Graph`].
pub type NodeIndex = usize;

/// Dense index of a directed edge inside a [`Graph`].
pub type EdgeIndex = usize;

/// Cartesian coordinates of a waypoint, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for [f64; 3] {
    fn from(position: Position) -> Self {
        [position.x, position.y, position.z]
    }
}

/// Node definition as it appears in `nodes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(rename = "pos")]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Value>,
    /// Any other attributes (labels, room names, ...) carried through untouched.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

impl NodeSpec {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            floor: None,
            metadata: BTreeMap::new(),
        }
    }
}

/// Undirected edge definition as it appears in `edges.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(default, deserialize_with = "string_or_none")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub to: Option<String>,
    /// Accessibility flag; only accessible edges are usable in elevator mode.
    #[serde(default)]
    pub ada: bool,
    #[serde(rename = "type", default = "default_edge_kind")]
    pub kind: String,
    /// Walking length override. Never shorter than the straight line between
    /// the endpoints; shorter values are raised to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

/// Non-string endpoint ids are treated as missing so the edge gets skipped.
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(Some(id)),
        _ => Ok(None),
    }
}

fn default_edge_kind() -> String {
    "corridor".to_string()
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ada: false,
            kind: default_edge_kind(),
            length: None,
        }
    }

    pub fn accessible(mut self, ada: bool) -> Self {
        self.ada = ada;
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }
}

/// Waypoint within the routing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub position: Position,
    pub floor: Option<Value>,
    pub metadata: BTreeMap<String, Value>,
}

/// Directed edge within the routing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Directed id in `"{FROM}__{TO}"` form.
    pub id: String,
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub accessible: bool,
    pub kind: String,
    /// Euclidean length between the endpoint positions.
    pub length: f64,
}

impl Edge {
    pub fn is_stairs(&self) -> bool {
        self.kind.eq_ignore_ascii_case("stairs")
    }
}

/// Build the directed edge id for `from -> to`.
pub fn edge_id(from: &str, to: &str) -> String {
    format!("{from}{EDGE_ID_SEPARATOR}{to}")
}

/// Reverse a directed edge id by splitting once on the first separator.
///
/// Returns `None` when the id carries no separator.
pub fn reverse_edge_id(id: &str) -> Option<String> {
    id.split_once(EDGE_ID_SEPARATOR)
        .map(|(from, to)| edge_id(to, from))
}

/// Immutable structural graph used by the search engine.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    node_index: HashMap<String, NodeIndex>,
    edges: Vec<Edge>,
    edge_index: HashMap<String, EdgeIndex>,
    adjacency: Vec<Vec<EdgeIndex>>,
    skipped_edges: usize,
}

impl Graph {
    /// Build the graph from node definitions and undirected edges.
    ///
    /// Every input edge becomes two directed edges sharing one length. Edges
    /// with a missing or unknown endpoint are dropped.
    pub fn build(nodes: BTreeMap<String, NodeSpec>, edges: &[EdgeSpec]) -> Self {
        let mut graph = Graph {
            nodes: Vec::with_capacity(nodes.len()),
            node_index: HashMap::with_capacity(nodes.len()),
            edges: Vec::with_capacity(edges.len() * 2),
            edge_index: HashMap::with_capacity(edges.len() * 2),
            adjacency: vec![Vec::new(); nodes.len()],
            skipped_edges: 0,
        };

        for (id, spec) in nodes {
            graph.node_index.insert(id.clone(), graph.nodes.len());
            graph.nodes.push(Node {
                id,
                position: spec.position,
                floor: spec.floor,
                metadata: spec.metadata,
            });
        }

        for spec in edges {
            let endpoints = spec
                .from
                .as_deref()
                .zip(spec.to.as_deref())
                .and_then(|(from, to)| {
                    Some((graph.node_index(from)?, graph.node_index(to)?))
                });

            let Some((from, to)) = endpoints else {
                warn!(
                    from = spec.from.as_deref().unwrap_or("<missing>"),
                    to = spec.to.as_deref().unwrap_or("<missing>"),
                    "skipping edge with unknown endpoint"
                );
                graph.skipped_edges += 1;
                continue;
            };

            let straight = graph.nodes[from]
                .position
                .distance_to(&graph.nodes[to].position);
            let length = match spec.length {
                Some(declared) if declared >= straight => declared,
                Some(declared) => {
                    warn!(
                        from = %graph.nodes[from].id,
                        to = %graph.nodes[to].id,
                        declared,
                        straight,
                        "declared edge length shorter than straight line; using straight line"
                    );
                    straight
                }
                None => straight,
            };
            graph.insert_edge(from, to, spec, length);
            graph.insert_edge(to, from, spec, length);
        }

        graph
    }

    fn insert_edge(&mut self, source: NodeIndex, target: NodeIndex, spec: &EdgeSpec, length: f64) {
        let edge = Edge {
            id: edge_id(&self.nodes[source].id, &self.nodes[target].id),
            source,
            target,
            accessible: spec.ada,
            kind: spec.kind.clone(),
            length,
        };

        if let Some(&existing) = self.edge_index.get(&edge.id) {
            self.edges[existing] = edge;
            return;
        }

        let index = self.edges.len();
        self.edge_index.insert(edge.id.clone(), index);
        self.adjacency[source].push(index);
        self.edges.push(edge);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of input edges dropped because an endpoint was unknown.
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|index| &self.nodes[index])
    }

    /// Iterate over all nodes in index order (sorted by id).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Resolve the position of a node.
    pub fn position(&self, id: &str) -> Option<Position> {
        self.node_by_id(id).map(|node| node.position)
    }

    /// Resolve a directed edge by its id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&index| &self.edges[index])
    }

    pub fn edge_at(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index]
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Outgoing directed edge ids for a node; empty for unknown or isolated nodes.
    pub fn outgoing(&self, id: &str) -> Vec<&str> {
        self.node_index(id)
            .map(|index| {
                self.neighbours(index)
                    .iter()
                    .map(|&edge| self.edges[edge].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Outgoing edge indices for a node index.
    pub fn neighbours(&self, node: NodeIndex) -> &[EdgeIndex] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}
