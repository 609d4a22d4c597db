mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wayfinder_cli::output::OutputFormat;
use wayfinder_lib::resolve_data_dir;

use commands::inspect::handle_inspect_command;
use commands::load_dataset;
use commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Indoor routing under mobility constraints and live conditions")]
struct Cli {
    /// Directory holding nodes.json and edges.json (defaults to $WAYFINDER_DATA_DIR, then ./data).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Live state document to use instead of <data-dir>/live_state.json.
    #[arg(long, global = true)]
    live_state: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the least-cost route between two nodes.
    Route(RouteArgs),
    /// Summarize the loaded graph and live state.
    Inspect {
        /// Also list the outgoing edges of this node.
        #[arg(long)]
        node: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Starting node id.
    #[arg(long = "from", required_unless_present = "request")]
    from: Option<String>,
    /// Destination node id.
    #[arg(long = "to", required_unless_present = "request")]
    to: Option<String>,
    /// Read the whole request (startNode, endNode, constraints, weights) from a JSON file.
    #[arg(
        long,
        conflicts_with_all = [
            "from",
            "to",
            "avoid_stairs",
            "require_elevator",
            "time",
            "distance",
            "crowd",
            "risk",
        ]
    )]
    request: Option<PathBuf>,
    /// Never traverse edges typed "stairs".
    #[arg(long)]
    avoid_stairs: bool,
    /// Only traverse accessible edges.
    #[arg(long)]
    require_elevator: bool,
    /// Weight of travel time. All weights zero means distance only.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
    /// Weight of walked distance.
    #[arg(long, default_value_t = 0.0)]
    distance: f64,
    /// Weight of the crowding penalty.
    #[arg(long, default_value_t = 0.0)]
    crowd: f64,
    /// Weight of the hazard penalty.
    #[arg(long, default_value_t = 0.0)]
    risk: f64,
}

impl From<RouteArgs> for RouteCommandArgs {
    fn from(args: RouteArgs) -> Self {
        Self {
            from: args.from,
            to: args.to,
            request: args.request,
            avoid_stairs: args.avoid_stairs,
            require_elevator: args.require_elevator,
            time: args.time,
            distance: args.distance,
            crowd: args.crowd,
            risk: args.risk,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let dataset = load_dataset(&data_dir, cli.live_state.as_deref())?;

    match cli.command {
        Command::Route(args) => handle_route_command(&dataset, &args.into(), cli.format),
        Command::Inspect { node } => handle_inspect_command(&dataset, node.as_deref(), cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
