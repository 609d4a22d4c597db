//! Output formatting for route rendering.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use wayfinder_lib::{CostBreakdown, Graph, LiveStateProvider, RouteResult};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable hop list.
    #[default]
    Text,
    /// The route result as a single JSON document.
    Json,
}

/// One hop of a rendered route.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HopSummary {
    pub edge: String,
    pub from: String,
    pub to: String,
    pub kind: String,
    pub accessible: bool,
    pub breakdown: CostBreakdown,
}

/// Resolve per-hop details for a route against the live state used to plan it.
pub fn summarize_hops<P: LiveStateProvider + ?Sized>(
    graph: &Graph,
    live: &P,
    result: &RouteResult,
) -> Vec<HopSummary> {
    result
        .path_edges
        .iter()
        .filter_map(|id| graph.edge(id))
        .map(|edge| HopSummary {
            edge: edge.id.clone(),
            from: graph.node(edge.source).id.clone(),
            to: graph.node(edge.target).id.clone(),
            kind: edge.kind.clone(),
            accessible: edge.accessible,
            breakdown: CostBreakdown::for_edge(edge, &live.edge_state(&edge.id)),
        })
        .collect()
}

/// Human-friendly route view.
pub fn render_text(result: &RouteResult, hops: &[HopSummary], graph_version: u64) -> String {
    let mut out = String::new();
    let start = result.path_nodes.first().map(String::as_str).unwrap_or("?");
    let goal = result.path_nodes.last().map(String::as_str).unwrap_or("?");
    let _ = writeln!(
        out,
        "Route {start} -> {goal} ({} hops, total cost {:.2}, state v{graph_version})",
        result.hop_count(),
        result.total_cost
    );

    if hops.is_empty() {
        let _ = writeln!(out, "  already at destination");
        return out;
    }

    for (index, hop) in hops.iter().enumerate() {
        let access = if hop.accessible { ", accessible" } else { "" };
        let _ = writeln!(
            out,
            "  {:>2}. {} -> {} [{}{}] {:.1} m, {:.1} s",
            index + 1,
            hop.from,
            hop.to,
            hop.kind,
            access,
            hop.breakdown.length,
            hop.breakdown.time
        );
    }
    out
}

/// JSON route document: the route result plus the state version it was planned against.
pub fn render_json(result: &RouteResult, graph_version: u64) -> serde_json::Result<String> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Document<'a> {
        graph_version: u64,
        #[serde(flatten)]
        result: &'a RouteResult,
    }

    serde_json::to_string_pretty(&Document {
        graph_version,
        result,
    })
}
