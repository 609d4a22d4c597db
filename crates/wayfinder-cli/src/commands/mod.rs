// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs parses arguments and dispatches.

pub mod inspect;
pub mod route;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wayfinder_lib::{load_graph_files, load_live_state, DatasetPaths, Graph, LiveStateStore};

/// Graph and live state loaded from a data directory.
pub struct LoadedDataset {
    pub graph: Graph,
    pub live: LiveStateStore,
}

/// Load the graph from `data_dir` and the live state from `live_state`, falling
/// back to the data directory's own snapshot when present.
pub fn load_dataset(data_dir: &Path, live_state: Option<&Path>) -> Result<LoadedDataset> {
    let paths = DatasetPaths::in_dir(data_dir)
        .with_context(|| format!("failed to locate dataset in {}", data_dir.display()))?;
    let graph = load_graph_files(&paths.nodes, &paths.edges)
        .with_context(|| format!("failed to load graph from {}", data_dir.display()))?;

    let live_path: Option<PathBuf> = live_state.map(Path::to_path_buf).or(paths.live_state);
    let live = match live_path {
        Some(path) => {
            let update = load_live_state(&path)
                .with_context(|| format!("failed to load live state from {}", path.display()))?;
            LiveStateStore::with_update(update)
        }
        None => LiveStateStore::new(),
    };

    Ok(LoadedDataset { graph, live })
}
