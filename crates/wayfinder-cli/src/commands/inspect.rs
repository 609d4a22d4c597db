//! Inspect command handler for summarizing a loaded dataset.

use anyhow::{bail, Result};
use serde::Serialize;

use wayfinder_lib::LiveStateProvider;

use crate::commands::LoadedDataset;
use wayfinder_cli::output::OutputFormat;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingEdge<'a> {
    id: &'a str,
    kind: &'a str,
    accessible: bool,
    length: f64,
    status: wayfinder_lib::EdgeStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Inspection<'a> {
    nodes: usize,
    edges: usize,
    skipped_edges: usize,
    graph_version: u64,
    live_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    outgoing: Vec<OutgoingEdge<'a>>,
}

/// Handle the inspect subcommand.
///
/// Prints graph counts and, for `node`, its outgoing edges with their live status.
pub fn handle_inspect_command(
    dataset: &LoadedDataset,
    node: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let graph = &dataset.graph;
    let snapshot = dataset.live.snapshot();

    let mut outgoing = Vec::new();
    if let Some(id) = node {
        if !graph.contains_node(id) {
            bail!("unknown node: {id}");
        }
        for edge_id in graph.outgoing(id) {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            outgoing.push(OutgoingEdge {
                id: edge_id,
                kind: &edge.kind,
                accessible: edge.accessible,
                length: edge.length,
                status: dataset.live.edge_state(edge_id).status,
            });
        }
    }

    let inspection = Inspection {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        skipped_edges: graph.skipped_edges(),
        graph_version: snapshot.graph_version,
        live_entries: snapshot.edges.len(),
        node,
        outgoing,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inspection)?),
        OutputFormat::Text => {
            println!(
                "{} nodes, {} directed edges ({} input edges skipped)",
                inspection.nodes, inspection.edges, inspection.skipped_edges
            );
            println!(
                "live state v{} with {} entries",
                inspection.graph_version, inspection.live_entries
            );
            if let Some(id) = inspection.node {
                println!("outgoing from {id}:");
                for edge in &inspection.outgoing {
                    println!(
                        "- {} [{}] {:.1} m{}{}",
                        edge.id,
                        edge.kind,
                        edge.length,
                        if edge.accessible { ", accessible" } else { "" },
                        match edge.status {
                            wayfinder_lib::EdgeStatus::Blocked => ", BLOCKED",
                            wayfinder_lib::EdgeStatus::Open => "",
                        }
                    );
                }
            }
        }
    }

    Ok(())
}
