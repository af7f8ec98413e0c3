//! Error types for tabflow.

use std::path::PathBuf;
use thiserror::Error;

/// The closed set of ways a graph can fail to build or run.
#[derive(Debug, Error)]
pub enum Error {
    /// A `Source` operation (`Read`/`ReadNamed`) was asked to read from a
    /// graph that has no input bound to it.
    #[error("missing input for graph `{name}`")]
    MissingInput {
        /// Name of the unbound graph.
        name: String,
    },

    /// The graph shape itself is invalid: an operator was asked to do
    /// something the graph's structure can't support (e.g. `Join` with a
    /// graph that was never attached, `Reduce` with zero key columns).
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// A `Join` operator was given a joiner the executor does not
    /// recognize among the built-in strategies.
    #[error("unknown join strategy")]
    UnknownJoinStrategy,

    /// A row failed to parse from its wire encoding.
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem or I/O failure reading/writing rows or spill files.
    #[error("io error at {path}: {source}")]
    Io {
        /// Path involved in the failing operation, if known.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A column was missing, of the wrong type, or not comparable with
    /// another column's value (e.g. comparing `Int` against `Str`).
    #[error("column error: {0}")]
    Column(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
