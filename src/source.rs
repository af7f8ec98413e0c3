//! Row sources: named inputs bound at run time, and file readers.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;
use crate::row::Row;

/// A lazily-pulled stream of rows. Dropping the iterator releases
/// whatever it holds (open files, spill files) without further ceremony.
pub type RowStream = Box<dyn Iterator<Item = Result<Row, Error>> + Send>;

/// Parses one line of text into a `Row`. Pluggable so a graph isn't tied
/// to JSON: `io::jsonl::parser` and `io::csv` build their own.
pub type LineParser = Arc<dyn Fn(&str) -> Result<Row, Error> + Send + Sync>;

/// A restartable row-sequence producer: calling it again yields a fresh
/// stream from the top, which sub-graphs attached to `Join` rely on
/// since they are re-run on every parent run.
pub type SourceFactory = Arc<dyn Fn() -> RowStream + Send + Sync>;

/// The mapping from name to restartable source a `Graph` is run against.
pub type Inputs = HashMap<String, SourceFactory>;

/// How a graph obtains its first stream of rows.
#[derive(Clone)]
pub enum Source {
    /// Pulled at run time from whatever stream the caller binds under
    /// this name via `Graph::run`. Unbound names fail lazily with
    /// `Error::MissingInput` on the first pull.
    Named(String),
    /// Read line-by-line from a file, parsed with `parser`.
    File { path: PathBuf, parser: LineParser },
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Source::File { path, .. } => f.debug_struct("File").field("path", path).finish(),
        }
    }
}

impl Source {
    /// Opens a file-backed source as a `RowStream`, parsing it lazily
    /// one line at a time.
    pub fn open_file(path: PathBuf, parser: LineParser) -> RowStream {
        let lines = match File::open(&path) {
            Ok(file) => Ok(BufReader::new(file).lines()),
            Err(e) => Err(Error::io(path.clone(), e)),
        };
        match lines {
            Ok(lines) => {
                let path_for_err = path.clone();
                Box::new(lines.map(move |line| match line {
                    Ok(line) => parser(&line),
                    Err(e) => Err(Error::io(path_for_err.clone(), e)),
                }))
            }
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }

    /// A stream that immediately fails with `Error::MissingInput`, used
    /// when a `Named` source has no binding at run time.
    pub fn missing(name: String) -> RowStream {
        Box::new(std::iter::once(Err(Error::MissingInput { name })))
    }
}
