//! # tabflow
//!
//! An embeddable **computational-graph engine** over streams of tabular
//! rows — a small data-processing library in the MapReduce lineage.
//! Compose a pipeline declaratively (`read -> map -> sort -> reduce ->
//! join -> ...`), then execute it against one or more named row
//! sources to obtain a lazy output stream of rows.
//!
//! ## Key features
//!
//! - **Declarative, immutable graphs** — each chaining method on
//!   [`Graph`] returns a new graph; nothing is mutated in place, so a
//!   graph is safe to run more than once and safe to extend without
//!   disturbing the original.
//! - **Dynamic rows** — a [`Row`] is an order-preserving mapping from
//!   column name to a tagged [`Value`] (int, float, bool, string,
//!   coordinate pair, or nested row), rather than a fixed schema.
//! - **Sort-merge join** with four strategies (inner, left, right,
//!   outer) and explicit column-collision row-merge semantics.
//! - **External sort** that spills bounded-size runs to disk and
//!   k-way merges them, bounding peak memory independent of input size.
//! - **Grouped reduction** over pre-sorted streams, with a small
//!   built-in reducer library (`First`, `TopN`, `Count`, `Sum`,
//!   `TermFrequency`).
//! - **A mapper library** covering projection, renaming, filtering,
//!   splitting, arithmetic, haversine distance, and timestamp parsing.
//!
//! ## Quick start
//!
//! ```no_run
//! use tabflow::graph::Graph;
//! use tabflow::mapper::library::{FilterPunctuation, LowerCase, Split};
//! use tabflow::reduce::reducers::Count;
//! use tabflow::source::Inputs;
//! use std::collections::HashMap;
//!
//! # fn main() {
//! let graph = Graph::from_named_source("docs")
//!     .map(FilterPunctuation::new("text"))
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text"))
//!     .sort(["text"])
//!     .reduce(Count::new("count"), ["text"]);
//!
//! let inputs: Inputs = HashMap::new();
//! let _output = graph.run(inputs);
//! # }
//! ```
//!
//! ## Core concepts
//!
//! ### `Graph` (C7)
//! An immutable, composable DAG description: an ordered operator list,
//! plus one embedded sub-graph per `Join` operator. See [`graph::Graph`].
//!
//! ### `Row` / `Value` (C1)
//! The universal record type. See [`row::Row`] and [`value::Value`].
//!
//! ### Operators (C3)
//! `Map`, `Reduce`, `Sort`, `Join`, and the two row sources — see
//! [`operator::Operator`], [`mapper`], [`reduce`], [`sort`], [`join`],
//! [`source`].
//!
//! ### Executor (C8)
//! A single sequential, pull-based pass over a graph's operators,
//! described in [`executor`].
//!
//! ## Concurrency
//! Strictly single-threaded and cooperative: no thread pool, no
//! background tasks. Work happens only as rows are pulled; dropping an
//! output stream releases everything it holds (open files, spill
//! files) without further ceremony.
//!
//! ## Feature flags
//! - `io-jsonl` (default): JSON-per-line row encoding.
//! - `io-csv` (default): CSV row encoding, via the `csv` crate.
//! - `metrics` (default): lightweight run counters, see [`metrics`].

pub mod config;
pub mod error;
pub mod executor;
pub mod graph;
pub mod join;
pub mod mapper;
pub mod operator;
pub mod reduce;
pub mod row;
pub mod sort;
pub mod source;
pub mod timeparse;
pub mod value;

#[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
#[cfg(feature = "metrics")]
pub mod metrics;

pub mod io;

pub mod testing;

pub use error::{Error, Result};
pub use graph::Graph;
pub use row::Row;
pub use value::Value;
