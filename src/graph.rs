//! `Graph` (C7): an immutable, composable DAG description.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Error;
use crate::executor;
use crate::join::Joiner;
use crate::mapper::Mapper;
use crate::operator::Operator;
use crate::reduce::Reducer;
use crate::source::{Inputs, LineParser, RowStream, Source};

/// An immutable graph description: an ordered operator list plus one
/// embedded sub-graph per `Join` operator, in declaration order.
///
/// Every chaining method allocates a new operator vector and returns a
/// new `Graph`; nothing here is interior-mutable, so running a graph
/// twice — or running an extension of it — never disturbs the
/// original (the "idempotently runnable" and "extension" properties).
/// This is a deliberate departure from a mutable shared graph-builder:
/// see `DESIGN.md`.
#[derive(Clone)]
pub struct Graph {
    pub(crate) operations: Arc<[Operator]>,
    pub(crate) join_graphs: Arc<[Graph]>,
}

impl Graph {
    fn from_source(source: Source) -> Self {
        Graph {
            operations: Arc::from(vec![Operator::Source(source)]),
            join_graphs: Arc::from(Vec::new()),
        }
    }

    /// A graph whose rows are pulled, at run time, from whatever stream
    /// is bound under `name` in the `run` call's `Inputs` map.
    pub fn from_named_source(name: impl Into<String>) -> Self {
        Graph::from_source(Source::Named(name.into()))
    }

    /// A graph that reads `path` line by line, parsing each line with
    /// `parser`.
    pub fn from_file(path: impl Into<PathBuf>, parser: LineParser) -> Self {
        Graph::from_source(Source::File {
            path: path.into(),
            parser,
        })
    }

    fn extend(&self, operator: Operator) -> Self {
        let mut ops = Vec::with_capacity(self.operations.len() + 1);
        ops.extend(self.operations.iter().cloned());
        ops.push(operator);
        Graph {
            operations: Arc::from(ops),
            join_graphs: Arc::clone(&self.join_graphs),
        }
    }

    pub fn map(&self, mapper: impl Mapper + 'static) -> Self {
        self.extend(Operator::Map(Arc::new(mapper)))
    }

    /// Appends a `Reduce`. Precondition (user contract, not enforced):
    /// the input is already sorted ascending by `keys`.
    pub fn reduce(&self, reducer: impl Reducer + 'static, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extend(Operator::Reduce {
            reducer: Arc::new(reducer),
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }

    pub fn sort(&self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extend(Operator::Sort {
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }

    /// Appends a `Join`, recording `right` as the corresponding entry
    /// of `join_graphs`. Precondition: both inputs sorted by `keys`.
    pub fn join(
        &self,
        joiner: impl Joiner + 'static,
        right: Graph,
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut ops = Vec::with_capacity(self.operations.len() + 1);
        ops.extend(self.operations.iter().cloned());
        ops.push(Operator::Join {
            joiner: Arc::new(joiner),
            keys: keys.into_iter().map(Into::into).collect(),
        });
        let mut join_graphs = Vec::with_capacity(self.join_graphs.len() + 1);
        join_graphs.extend(self.join_graphs.iter().cloned());
        join_graphs.push(right);
        Graph {
            operations: Arc::from(ops),
            join_graphs: Arc::from(join_graphs),
        }
    }

    /// Executes the graph against `inputs` with the default
    /// `EngineConfig`, returning a lazy output stream.
    pub fn run(&self, inputs: Inputs) -> RowStream {
        self.run_with_config(inputs, &EngineConfig::default())
    }

    /// As `run`, but with an explicit `EngineConfig` (e.g. a smaller
    /// `spill_threshold` to force `Sort`'s external-merge path in tests).
    pub fn run_with_config(&self, inputs: Inputs, config: &EngineConfig) -> RowStream {
        executor::execute(self, &inputs, config)
    }

    /// Validates the structural invariants: the first operator (if any)
    /// must be a source and no other may be, and the number of embedded
    /// join sub-graphs must match the number of `Join` operators. These
    /// surface as `MalformedGraph` failures through the run rather than
    /// panicking at construction time.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let join_count = self
            .operations
            .iter()
            .filter(|op| matches!(op, Operator::Join { .. }))
            .count();
        if join_count != self.join_graphs.len() {
            return Err(Error::MalformedGraph(format!(
                "graph has {} join operator(s) but {} attached sub-graph(s)",
                join_count,
                self.join_graphs.len()
            )));
        }
        match self.operations.first() {
            None => return Err(Error::MalformedGraph("graph has no operations".to_string())),
            Some(Operator::Source(_)) => {}
            Some(_) => {
                return Err(Error::MalformedGraph(
                    "first operator must be a source".to_string(),
                ))
            }
        }
        if self.operations[1..]
            .iter()
            .any(|op| matches!(op, Operator::Source(_)))
        {
            return Err(Error::MalformedGraph(
                "a source operator may only appear first".to_string(),
            ));
        }
        Ok(())
    }
}
