//! Live edge state overlay.
//!
//! Dynamic conditions (closures, crowding, slowdowns, hazards) are keyed by
//! directed edge id and owned by an external updater. The search engine only
//! ever reads them through [`LiveStateProvider`], one edge at a time.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::reverse_edge_id;

/// Whether an edge can currently be traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    #[default]
    Open,
    Blocked,
}

/// Dynamic attributes of one directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeState {
    pub status: EdgeStatus,
    /// Congestion in `[0, 1]`.
    pub crowd_level: f64,
    /// Slowdown multiplier; values below 1 have no effect.
    pub speed_factor: f64,
    /// Hazard intensity in `[0, 1]`.
    pub hazard_level: f64,
}

impl Default for EdgeState {
    fn default() -> Self {
        Self {
            status: EdgeStatus::Open,
            crowd_level: 0.0,
            speed_factor: 1.0,
            hazard_level: 0.0,
        }
    }
}

impl EdgeState {
    pub fn blocked() -> Self {
        Self {
            status: EdgeStatus::Blocked,
            ..Self::default()
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == EdgeStatus::Blocked
    }
}

/// Read surface over live edge state.
///
/// Implementations must return a whole record per call; no consistency
/// across separate calls is expected.
pub trait LiveStateProvider {
    /// Current state of `edge_id`, or [`EdgeState::default`] when unknown.
    fn edge_state(&self, edge_id: &str) -> EdgeState;
}

impl LiveStateProvider for HashMap<String, EdgeState> {
    fn edge_state(&self, edge_id: &str) -> EdgeState {
        self.get(edge_id).copied().unwrap_or_default()
    }
}

impl<P: LiveStateProvider + ?Sized> LiveStateProvider for &P {
    fn edge_state(&self, edge_id: &str) -> EdgeState {
        (**self).edge_state(edge_id)
    }
}

impl<P: LiveStateProvider + ?Sized> LiveStateProvider for Arc<P> {
    fn edge_state(&self, edge_id: &str) -> EdgeState {
        (**self).edge_state(edge_id)
    }
}

/// Provider with every edge in its default state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLiveState;

impl LiveStateProvider for NoLiveState {
    fn edge_state(&self, _edge_id: &str) -> EdgeState {
        EdgeState::default()
    }
}

/// Full-replacement update for a [`LiveStateStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStateUpdate {
    /// Explicit version to adopt; the store increments its own when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_version: Option<u64>,
    #[serde(default)]
    pub edges: HashMap<String, EdgeState>,
    /// Apply every entry to the reversed edge id as well.
    #[serde(default = "default_mirror")]
    pub mirror_undirected: bool,
}

fn default_mirror() -> bool {
    true
}

impl Default for LiveStateUpdate {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl LiveStateUpdate {
    pub fn new(edges: HashMap<String, EdgeState>) -> Self {
        Self {
            graph_version: None,
            edges,
            mirror_undirected: true,
        }
    }

    pub fn directed(edges: HashMap<String, EdgeState>) -> Self {
        Self {
            mirror_undirected: false,
            ..Self::new(edges)
        }
    }

    /// Resolve the update into the exact map the store will hold.
    ///
    /// Entries are applied in sorted id order so a mirrored entry and an
    /// explicit entry for the same id always resolve the same way.
    pub fn into_edges(self) -> HashMap<String, EdgeState> {
        if !self.mirror_undirected {
            return self.edges;
        }

        let mut ordered: Vec<(String, EdgeState)> = self.edges.into_iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));

        let mut resolved = HashMap::with_capacity(ordered.len() * 2);
        for (id, state) in ordered {
            if let Some(reverse) = reverse_edge_id(&id) {
                resolved.insert(reverse, state);
            }
            resolved.insert(id, state);
        }
        resolved
    }
}

/// Point-in-time view of a [`LiveStateStore`].
#[derive(Debug, Clone, Default)]
pub struct LiveStateSnapshot {
    pub graph_version: u64,
    pub edges: Arc<HashMap<String, EdgeState>>,
}

/// Shared, externally replaced live state.
///
/// Readers take the lock only long enough to copy one record; replacement
/// swaps the whole map at once.
#[derive(Debug)]
pub struct LiveStateStore {
    inner: RwLock<LiveStateSnapshot>,
}

impl Default for LiveStateStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(LiveStateSnapshot {
                graph_version: 1,
                edges: Arc::new(HashMap::new()),
            }),
        }
    }
}

impl LiveStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `update`.
    pub fn with_update(update: LiveStateUpdate) -> Self {
        let store = Self::new();
        store.replace(update);
        store
    }

    /// Replace the whole edge map and return the resulting graph version.
    pub fn replace(&self, update: LiveStateUpdate) -> u64 {
        let explicit_version = update.graph_version;
        let mirrored = update.mirror_undirected;
        let edges = Arc::new(update.into_edges());

        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.graph_version = explicit_version.unwrap_or(guard.graph_version.saturating_add(1));
        guard.edges = edges;

        debug!(
            graph_version = guard.graph_version,
            edge_count = guard.edges.len(),
            mirrored,
            "replaced live edge state"
        );
        guard.graph_version
    }

    pub fn graph_version(&self) -> u64 {
        self.read().graph_version
    }

    /// Current version and edge map.
    pub fn snapshot(&self) -> LiveStateSnapshot {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LiveStateSnapshot> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LiveStateProvider for LiveStateStore {
    fn edge_state(&self, edge_id: &str) -> EdgeState {
        self.read().edges.edge_state(edge_id)
    }
}
