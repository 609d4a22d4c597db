//! Hard traversal constraints.
//!
//! Constraints never influence cost: an edge either passes every gate or is
//! not traversable at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::Edge;
use crate::live::EdgeState;

/// Mobility constraints attached to a route request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteConstraints {
    /// Reject edges typed `stairs` (any case).
    pub avoid_stairs: bool,
    /// Only traverse edges flagged as accessible.
    ///
    /// The edge type is not consulted: an accessible `stairs` edge passes.
    pub require_elevator: bool,
}

/// Reason an edge was rejected, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Blocked,
    Stairs,
    Inaccessible,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Rejection::Blocked => "blocked",
            Rejection::Stairs => "stairs",
            Rejection::Inaccessible => "inaccessible",
        };
        f.write_str(value)
    }
}

impl RouteConstraints {
    /// First gate that rejects `edge`, if any.
    pub fn check(&self, edge: &Edge, state: &EdgeState) -> Option<Rejection> {
        if state.is_blocked() {
            return Some(Rejection::Blocked);
        }

        if self.avoid_stairs && edge.is_stairs() {
            return Some(Rejection::Stairs);
        }

        if self.require_elevator && !edge.accessible {
            return Some(Rejection::Inaccessible);
        }

        None
    }

    /// Whether `edge` may be traversed in its current state.
    pub fn admit(&self, edge: &Edge, state: &EdgeState) -> bool {
        self.check(edge, state).is_none()
    }
}
