use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the Wayfinder library.
pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a route request referenced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Goal => f.write_str("goal"),
        }
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Start or goal node is not part of the graph. Raised before any search work.
    #[error("unknown {endpoint} node: {id}")]
    UnknownNode { endpoint: Endpoint, id: String },

    /// The frontier was exhausted without reaching the goal.
    #[error("no path found from {start} to {goal} under current constraints/state")]
    NoPath { start: String, goal: String },

    /// Raised when a request is structurally invalid.
    #[error("invalid route request: {message}")]
    InvalidRequest { message: String },

    /// The caller aborted the search between frontier expansions.
    #[error("route search from {start} to {goal} was cancelled")]
    Cancelled { start: String, goal: String },

    /// Dataset directory or file could not be located.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// A dataset file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means "no feasible route" rather than a bad request.
    pub fn is_no_path(&self) -> bool {
        matches!(self, Error::NoPath { .. })
    }
}
