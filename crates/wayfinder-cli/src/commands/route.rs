//! Route command handler for computing paths between waypoints.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use wayfinder_lib::{plan_route, RouteConstraints, RouteRequest, Weights};

use crate::commands::LoadedDataset;
use wayfinder_cli::output::{render_json, render_text, summarize_hops, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone, Default)]
pub struct RouteCommandArgs {
    /// Starting node id.
    pub from: Option<String>,
    /// Destination node id.
    pub to: Option<String>,
    /// JSON request file; replaces the inline options when given.
    pub request: Option<PathBuf>,
    pub avoid_stairs: bool,
    pub require_elevator: bool,
    pub time: f64,
    pub distance: f64,
    pub crowd: f64,
    pub risk: f64,
}

impl RouteCommandArgs {
    fn weights(&self) -> Weights {
        let weights = Weights {
            time: self.time,
            distance: self.distance,
            crowd: self.crowd,
            risk: self.risk,
        };
        if weights == Weights::default() {
            info!("no weights given; optimizing for distance");
            return Weights::distance();
        }
        weights
    }

    /// Convert CLI args to a library [`RouteRequest`].
    pub fn to_request(&self) -> Result<RouteRequest> {
        if let Some(path) = &self.request {
            let body = fs::read_to_string(path)
                .with_context(|| format!("failed to read request file {}", path.display()))?;
            return RouteRequest::from_json(&body)
                .with_context(|| format!("invalid request in {}", path.display()));
        }

        let from = self.from.clone().context("--from is required without --request")?;
        let to = self.to.clone().context("--to is required without --request")?;
        Ok(RouteRequest::new(from, to)
            .with_constraints(RouteConstraints {
                avoid_stairs: self.avoid_stairs,
                require_elevator: self.require_elevator,
            })
            .with_weights(self.weights()))
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    dataset: &LoadedDataset,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = args.to_request()?;
    let result = plan_route(&dataset.graph, &dataset.live, &request)
        .with_context(|| format!("failed to route {} -> {}", request.start, request.goal))?;
    let graph_version = dataset.live.graph_version();

    match format {
        OutputFormat::Text => {
            let hops = summarize_hops(&dataset.graph, &dataset.live, &result);
            print!("{}", render_text(&result, &hops, graph_version));
        }
        OutputFormat::Json => {
            println!("{}", render_json(&result, graph_version)?);
        }
    }

    Ok(())
}
