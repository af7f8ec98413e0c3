//! The executor (C8): a single sequential pass driving a graph's
//! operators in declaration order.

use log::{debug, trace};

use crate::config::EngineConfig;
use crate::error::Error;
use crate::graph::Graph;
use crate::join::merge_join;
use crate::operator::Operator;
use crate::reduce::GroupedReduce;
use crate::row::Row;
use crate::sort::external_sort;
use crate::source::{Inputs, RowStream, Source};

/// Walks `graph.operations` in order: a source seeds the stream, every
/// unary operator wraps the current stream, and a `Join` additionally
/// executes the next sub-graph (recursively, against the same
/// `inputs`) to supply its right-hand input.
pub fn execute(graph: &Graph, inputs: &Inputs, config: &EngineConfig) -> RowStream {
    if let Err(e) = graph.validate() {
        return Box::new(std::iter::once(Err(e)));
    }

    debug!("executor: running graph with {} operator(s)", graph.operations.len());

    let mut stream: Option<RowStream> = None;
    let mut join_index = 0usize;

    for (i, op) in graph.operations.iter().enumerate() {
        trace!("executor: applying operator #{i}: {op:?}");
        stream = Some(match op {
            Operator::Source(source) => source_stream(source, inputs),
            Operator::Map(mapper) => {
                let input = stream.take().expect("source must precede any unary operator");
                let mapper = mapper.clone();
                Box::new(input.flat_map(move |row| match row {
                    Ok(row) => match mapper.map(row) {
                        Ok(rows) => rows.into_iter().map(Ok).collect::<Vec<_>>(),
                        Err(e) => vec![Err(e)],
                    },
                    Err(e) => vec![Err(e)],
                }))
            }
            Operator::Reduce { reducer, keys } => {
                let input = stream.take().expect("source must precede any unary operator");
                Box::new(GroupedReduce::new(input, keys.clone(), reducer.clone()))
            }
            Operator::Sort { keys } => {
                let input = stream.take().expect("source must precede any unary operator");
                external_sort(input, keys.clone(), config)
            }
            Operator::Join { joiner, keys } => {
                let left = stream.take().expect("source must precede any unary operator");
                let Some(right_graph) = graph.join_graphs.get(join_index) else {
                    return Box::new(std::iter::once(Err(Error::MalformedGraph(format!(
                        "no sub-graph attached for join #{join_index}"
                    )))));
                };
                join_index += 1;
                let right = execute(right_graph, inputs, config);
                merge_join(left, right, keys.clone(), joiner.clone())
            }
        });
    }

    stream.unwrap_or_else(|| Box::new(std::iter::empty::<Result<Row, Error>>()))
}

fn source_stream(source: &Source, inputs: &Inputs) -> RowStream {
    match source {
        Source::Named(name) => match inputs.get(name) {
            Some(factory) => factory(),
            None => Source::missing(name.clone()),
        },
        Source::File { path, parser } => Source::open_file(path.clone(), parser.clone()),
    }
}
