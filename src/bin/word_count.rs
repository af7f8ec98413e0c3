//! Counts words across one or more text documents.
//!
//! Usage: `word_count <input.jsonl> <output.jsonl>`
//!
//! Input rows are expected to have a `text` column; output rows carry
//! `text` and `count`, sorted ascending by count then by word.

use anyhow::{Context, Result};

use tabflow::graph::Graph;
use tabflow::io::jsonl;
use tabflow::mapper::library::{FilterPunctuation, LowerCase, Split};
use tabflow::reduce::reducers::Count;

fn main() -> Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let input = args.next().context("usage: word_count <input.jsonl> <output.jsonl>")?;
    let output = args.next().context("usage: word_count <input.jsonl> <output.jsonl>")?;

    let graph = Graph::from_file(&input, jsonl::parser())
        .map(FilterPunctuation::new("text"))
        .map(LowerCase::new("text"))
        .map(Split::new("text"))
        .sort(["text"])
        .reduce(Count::new("count"), ["text"])
        .sort(["count", "text"]);

    let rows = graph.run(Default::default());
    let written = jsonl::write_file(&output, rows).with_context(|| format!("writing {output}"))?;
    log::info!("wrote {written} row(s) to {output}");
    Ok(())
}
