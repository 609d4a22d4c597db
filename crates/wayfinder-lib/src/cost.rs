//! Composite edge cost.
//!
//! Every component is non-negative and non-decreasing in each live-state
//! dimension, which the A* search relies on.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::Edge;
use crate::live::EdgeState;

/// Baseline walking speed used to turn length into travel time (m/s).
pub const BASE_SPEED_MPS: f64 = 1.2;

/// Coupling of crowd level into travel time.
pub const CROWD_TIME_FACTOR: f64 = 0.8;

/// Per-criterion weights of a route request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub time: f64,
    pub distance: f64,
    pub crowd: f64,
    pub risk: f64,
}

impl Weights {
    /// Distance-only weighting.
    pub fn distance() -> Self {
        Self {
            distance: 1.0,
            ..Self::default()
        }
    }

    /// Time-only weighting.
    pub fn time() -> Self {
        Self {
            time: 1.0,
            ..Self::default()
        }
    }

    /// Copy with negative or non-finite weights replaced by zero.
    pub fn sanitized(&self) -> Self {
        let fix = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                warn!(weight = name, value, "clamping invalid weight to zero");
                0.0
            }
        };

        Self {
            time: fix("time", self.time),
            distance: fix("distance", self.distance),
            crowd: fix("crowd", self.crowd),
            risk: fix("risk", self.risk),
        }
    }
}

/// Unweighted cost components of one edge under its live state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Travel time in seconds including slowdown and crowding.
    pub time: f64,
    pub length: f64,
    pub crowd_penalty: f64,
    pub risk_penalty: f64,
}

impl CostBreakdown {
    pub fn for_edge(edge: &Edge, state: &EdgeState) -> Self {
        let length = edge.length;
        let crowd = unit_interval(state.crowd_level);
        let hazard = unit_interval(state.hazard_level);

        // f64::max ignores NaN, so a NaN speed factor reads as no slowdown.
        let slowdown = state.speed_factor.max(1.0);
        let time = length / BASE_SPEED_MPS * slowdown * (1.0 + CROWD_TIME_FACTOR * crowd);

        Self {
            time,
            length,
            crowd_penalty: crowd * length,
            risk_penalty: hazard * length,
        }
    }

    /// Weighted sum; zero-weighted components contribute exactly zero.
    pub fn weighted(&self, weights: &Weights) -> f64 {
        term(weights.time, self.time)
            + term(weights.distance, self.length)
            + term(weights.crowd, self.crowd_penalty)
            + term(weights.risk, self.risk_penalty)
    }
}

/// Cost of traversing `edge` in `state` under `weights`.
///
/// `weights` are expected to be non-negative (see [`Weights::sanitized`]).
pub fn edge_cost(edge: &Edge, state: &EdgeState, weights: &Weights) -> f64 {
    CostBreakdown::for_edge(edge, state).weighted(weights)
}

fn term(weight: f64, value: f64) -> f64 {
    if weight > 0.0 {
        weight * value
    } else {
        0.0
    }
}

fn unit_interval(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
