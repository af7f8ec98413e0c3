//! Computes TF-IDF for every word/document pair and keeps, per document,
//! the top 3 words by score.
//!
//! Usage: `tf_idf <input.jsonl> <output.jsonl>`
//!
//! Input rows are expected to have `doc_id` and `text` columns.

use anyhow::{Context, Result};

use tabflow::graph::Graph;
use tabflow::io::jsonl;
use tabflow::join::InnerJoiner;
use tabflow::mapper::library::{Division, FilterPunctuation, Logarithm, LowerCase, Product, Project, Split};
use tabflow::reduce::reducers::{Count, First, TermFrequency, TopN};

const DOC_COLUMN: &str = "doc_id";
const TEXT_COLUMN: &str = "text";
const RESULT_COLUMN: &str = "tf_idf";

fn main() -> Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let input = args.next().context("usage: tf_idf <input.jsonl> <output.jsonl>")?;
    let output = args.next().context("usage: tf_idf <input.jsonl> <output.jsonl>")?;

    let split_words = Graph::from_file(&input, jsonl::parser())
        .map(FilterPunctuation::new(TEXT_COLUMN))
        .map(LowerCase::new(TEXT_COLUMN))
        .map(Split::new(TEXT_COLUMN));

    let count_docs = Graph::from_file(&input, jsonl::parser()).reduce(Count::new("doc_count"), Vec::<String>::new());

    let count_idf = split_words
        .sort([DOC_COLUMN, TEXT_COLUMN])
        .reduce(First, [DOC_COLUMN, TEXT_COLUMN])
        .sort([TEXT_COLUMN])
        .reduce(Count::new("doc_word_count"), [TEXT_COLUMN])
        .join(InnerJoiner::new(), count_docs, Vec::<String>::new())
        .map(Division::new("doc_count", "doc_word_count", "inv_doc_word_freq"))
        .map(Logarithm::new("inv_doc_word_freq", "idf"));

    let count_tf = split_words
        .sort([DOC_COLUMN])
        .reduce(TermFrequency::new(TEXT_COLUMN, "tf"), [DOC_COLUMN])
        .sort([TEXT_COLUMN]);

    let tf_idf = count_idf
        .sort([TEXT_COLUMN])
        .join(InnerJoiner::new(), count_tf, [TEXT_COLUMN])
        .map(Product::new(["tf", "idf"], RESULT_COLUMN))
        .map(Project::new([DOC_COLUMN, TEXT_COLUMN, RESULT_COLUMN]))
        .sort([TEXT_COLUMN])
        .reduce(TopN::new(RESULT_COLUMN, 3), [TEXT_COLUMN])
        .sort([DOC_COLUMN])
        .reduce(TopN::new(RESULT_COLUMN, 3), [DOC_COLUMN]);

    let rows = tf_idf.run(Default::default());
    let written = jsonl::write_file(&output, rows).with_context(|| format!("writing {output}"))?;
    log::info!("wrote {written} row(s) to {output}");
    Ok(())
}
