use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{EdgeSpec, Graph, NodeSpec};
use crate::live::LiveStateUpdate;

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "WAYFINDER_DATA_DIR";

/// Data directory used when neither an override nor the environment is set.
pub const DEFAULT_DATA_DIR: &str = "data";

pub const NODES_FILENAME: &str = "nodes.json";
pub const EDGES_FILENAME: &str = "edges.json";
pub const LIVE_STATE_FILENAME: &str = "live_state.json";

/// Paths to the dataset files inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    /// Live state snapshot, if one exists.
    pub live_state: Option<PathBuf>,
}

impl DatasetPaths {
    /// Locate dataset files in `dir`, failing if the graph files are missing.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        let nodes = dir.join(NODES_FILENAME);
        let edges = dir.join(EDGES_FILENAME);
        for path in [&nodes, &edges] {
            if !path.is_file() {
                return Err(Error::DatasetNotFound { path: path.clone() });
            }
        }

        let live_state = dir.join(LIVE_STATE_FILENAME);
        let live_state = live_state.is_file().then_some(live_state);

        Ok(Self {
            nodes,
            edges,
            live_state,
        })
    }
}

/// Resolve the data directory: explicit override, then `WAYFINDER_DATA_DIR`,
/// then `./data`.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        debug!(path = %dir.display(), "using data directory from override");
        return dir.to_path_buf();
    }

    match env::var_os(DATA_DIR_ENV) {
        Some(value) if !value.is_empty() => {
            let dir = PathBuf::from(value);
            debug!(path = %dir.display(), "using data directory from {}", DATA_DIR_ENV);
            dir
        }
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| Error::DatasetParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and build the graph from `nodes.json` and `edges.json`.
pub fn load_graph_files(nodes_path: &Path, edges_path: &Path) -> Result<Graph> {
    let nodes: BTreeMap<String, NodeSpec> = read_json(nodes_path)?;
    let edges: Vec<EdgeSpec> = read_json(edges_path)?;

    let graph = Graph::build(nodes, &edges);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped = graph.skipped_edges(),
        "graph loaded"
    );
    Ok(graph)
}

/// Load the graph stored in a data directory.
pub fn load_graph(dir: impl AsRef<Path>) -> Result<Graph> {
    let paths = DatasetPaths::in_dir(dir.as_ref())?;
    load_graph_files(&paths.nodes, &paths.edges)
}

/// Load a live state update document.
pub fn load_live_state(path: impl AsRef<Path>) -> Result<LiveStateUpdate> {
    let update: LiveStateUpdate = read_json(path.as_ref())?;
    info!(
        path = %path.as_ref().display(),
        entries = update.edges.len(),
        mirror = update.mirror_undirected,
        "live state loaded"
    );
    Ok(update)
}
