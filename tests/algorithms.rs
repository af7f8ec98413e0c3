//! End-to-end graphs exercising the full operator set together: word
//! count, TF-IDF, PMI, and average speed by hour/weekday.

use std::collections::HashMap;
use std::sync::Arc;

use tabflow::graph::Graph;
use tabflow::join::InnerJoiner;
use tabflow::mapper::library::{
    Division, Filter, FilterPunctuation, Haversine, Hour, Logarithm, LowerCase, Normalize, Product, Project, Rename,
    Split, TimeDifference, ToCalendarWeekday, Weekday,
};
use tabflow::reduce::reducers::{Count, First, Sum, TermFrequency, TopN};
use tabflow::row::Row;
use tabflow::source::{Inputs, SourceFactory};
use tabflow::testing::builders::RowBuilder;
use tabflow::testing::fixtures::{text_documents, trip_rows};

fn named_input(name: &str, rows: Vec<Row>) -> Inputs {
    let mut inputs: Inputs = HashMap::new();
    let factory: SourceFactory = Arc::new(move || {
        let rows = rows.clone();
        Box::new(rows.into_iter().map(Ok))
    });
    inputs.insert(name.to_string(), factory);
    inputs
}

fn run(graph: &Graph, inputs: Inputs) -> Vec<Row> {
    graph.run(inputs).collect::<Result<Vec<_>, _>>().expect("graph should not fail")
}

fn word_count_graph(input_stream_name: &str) -> Graph {
    Graph::from_named_source(input_stream_name)
        .map(FilterPunctuation::new("text"))
        .map(LowerCase::new("text"))
        .map(Split::new("text"))
        .sort(["text"])
        .reduce(Count::new("count"), ["text"])
        .sort(["count", "text"])
}

#[test]
fn word_count_counts_repeated_words_case_insensitively() {
    let docs = vec![
        RowBuilder::new().col("text", "Hello, hello world!").build(),
        RowBuilder::new().col("text", "world of rust").build(),
    ];
    let out = run(&word_count_graph("docs"), named_input("docs", docs));
    let hello = out.iter().find(|r| r.get("text").unwrap().as_str() == Some("hello")).unwrap();
    assert_eq!(hello.get("count").unwrap().as_int(), Some(2));
    // Ascending by count then by word: single-occurrence words precede "hello".
    let counts: Vec<_> = out.iter().map(|r| r.get("count").unwrap().as_int().unwrap()).collect();
    let mut sorted = counts.clone();
    sorted.sort_unstable();
    assert_eq!(counts, sorted);
}

fn inverted_index_graph(input_stream_name: &str) -> Graph {
    let doc_column = "doc_id";
    let text_column = "text";
    let result_column = "tf_idf";

    let split_words = Graph::from_named_source(input_stream_name)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column));

    let count_docs = Graph::from_named_source(input_stream_name).reduce(Count::new("doc_count"), Vec::<String>::new());

    let count_idf = split_words
        .sort([doc_column, text_column])
        .reduce(First, [doc_column, text_column])
        .sort([text_column])
        .reduce(Count::new("doc_word_count"), [text_column])
        .join(InnerJoiner::new(), count_docs, Vec::<String>::new())
        .map(Division::new("doc_count", "doc_word_count", "inv_doc_word_freq"))
        .map(Logarithm::new("inv_doc_word_freq", "idf"));

    let count_tf = split_words
        .sort([doc_column])
        .reduce(TermFrequency::new(text_column, "tf"), [doc_column])
        .sort([text_column]);

    count_idf
        .sort([text_column])
        .join(InnerJoiner::new(), count_tf, [text_column])
        .map(Product::new(["tf", "idf"], result_column))
        .map(Project::new([doc_column, text_column, result_column]))
        .sort([text_column])
        .reduce(TopN::new(result_column, 3), [text_column])
        .sort([doc_column])
        .reduce(TopN::new(result_column, 3), [doc_column])
}

#[test]
fn tf_idf_scores_every_document_and_keeps_top_three_words_per_document() {
    let out = run(&inverted_index_graph("docs"), named_input("docs", text_documents()));
    assert!(!out.is_empty());
    let mut per_doc: HashMap<String, usize> = HashMap::new();
    for row in &out {
        let doc = row.get("doc_id").unwrap().as_str().unwrap().to_string();
        *per_doc.entry(doc).or_insert(0) += 1;
        assert!(row.get("tf_idf").unwrap().as_float().is_some());
    }
    assert!(per_doc.values().all(|&n| n <= 3));
}

fn pmi_graph(input_stream_name: &str) -> Graph {
    let doc_column = "doc_id";
    let text_column = "text";

    let filtered_words = Graph::from_named_source(input_stream_name)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column))
        .sort([doc_column, text_column])
        .reduce(Count::new("word_doc_cnt"), [doc_column, text_column])
        .map(Filter::new(|row: &Row| {
            row.get("word_doc_cnt").and_then(|v| v.as_int()).is_some_and(|c| c > 1)
                && row.get(text_column).and_then(|v| v.as_str()).is_some_and(|w| w.len() > 4)
        }))
        .map(Project::new([doc_column, text_column, "word_doc_cnt"]));

    let docs_len = filtered_words
        .sort([doc_column])
        .reduce(Sum::new("word_doc_cnt"), [doc_column])
        .map(Rename::new("word_doc_cnt", "doc_len"));

    let words_doc_freq = filtered_words
        .sort([doc_column])
        .join(InnerJoiner::new(), docs_len.clone(), [doc_column])
        .map(Division::new("word_doc_cnt", "doc_len", "word_doc_freq"));

    let doc_total_len = docs_len
        .reduce(Sum::new("doc_len"), Vec::<String>::new())
        .map(Rename::new("doc_len", "doc_total_len"));

    let words_total_freq = filtered_words
        .sort([text_column])
        .reduce(Sum::new("word_doc_cnt"), [text_column])
        .map(Rename::new("word_doc_cnt", "word_total_cnt"))
        .join(InnerJoiner::new(), doc_total_len, Vec::<String>::new())
        .map(Division::new("word_total_cnt", "doc_total_len", "word_total_freq"))
        .map(Project::new([text_column, "word_total_freq"]));

    words_doc_freq
        .sort([text_column])
        .join(InnerJoiner::new(), words_total_freq, [text_column])
        .map(Division::new("word_doc_freq", "word_total_freq", "word_freq_quotient"))
        .map(Logarithm::new("word_freq_quotient", "pmi"))
        .sort([doc_column])
        .reduce(TopN::new("pmi", 10), [doc_column])
        .map(Project::new([doc_column, text_column, "pmi"]))
        .sort([doc_column])
}

#[test]
fn pmi_keeps_words_that_repeat_within_a_document() {
    let docs = vec![
        RowBuilder::new().col("doc_id", "d1").col("text", "rust rust rust programming language").build(),
        RowBuilder::new().col("doc_id", "d2").col("text", "hello world of programming").build(),
    ];
    let out = run(&pmi_graph("docs"), named_input("docs", docs));
    // "rust" repeats 3x in d1 and is long enough (>4 chars) to survive the filter.
    assert!(out.iter().any(|r| r.get("text").unwrap().as_str() == Some("rust")));
}

fn yandex_maps_graph(time_stream: &str, length_stream: &str) -> Graph {
    let edge_with_dist = Graph::from_named_source(length_stream)
        .map(Haversine::new("start", "end", "edge_length"))
        .map(Project::new(["edge_id", "edge_length"]))
        .sort(["edge_id"]);

    let logs_with_time = Graph::from_named_source(time_stream)
        .map(Hour::new("enter_time", "hour"))
        .map(Weekday::new("enter_time", "weekday"))
        .map(Filter::new(|row: &Row| row.get("hour").is_some() && row.get("weekday").is_some()))
        .map(TimeDifference::new("enter_time", "leave_time", "travel_time"))
        .map(Filter::new(|row: &Row| {
            row.get("travel_time").and_then(|v| v.as_float()).is_some_and(|t| t >= 0.0)
        }));

    let logs_with_total_time = logs_with_time
        .sort(["hour", "weekday"])
        .reduce(Sum::new("travel_time"), ["hour", "weekday"])
        .map(Rename::new("travel_time", "total_time"))
        .map(Project::new(["hour", "weekday", "total_time"]));

    let logs_with_total_dist = logs_with_time
        .sort(["edge_id"])
        .join(InnerJoiner::new(), edge_with_dist, ["edge_id"])
        .sort(["hour", "weekday"])
        .reduce(Sum::new("edge_length"), ["hour", "weekday"])
        .map(Rename::new("edge_length", "total_dist"))
        .map(Project::new(["hour", "weekday", "total_dist"]));

    logs_with_total_time
        .join(InnerJoiner::new(), logs_with_total_dist, ["hour", "weekday"])
        .map(Division::new("total_dist", "total_time", "speed"))
        .map(ToCalendarWeekday::new("weekday"))
        .map(Project::new(["hour", "weekday", "speed"]))
        .map(Normalize::new("speed", 3600.0))
        .sort(["hour", "weekday"])
}

#[test]
fn average_speed_is_positive_and_keyed_by_hour_and_weekday() {
    let trips = trip_rows();
    let time_rows: Vec<Row> = trips
        .iter()
        .map(|r| {
            RowBuilder::new()
                .col("edge_id", r.get("edge_id").unwrap().as_int().unwrap())
                .col("enter_time", r.get("enter_time").unwrap().as_str().unwrap())
                .col("leave_time", r.get("leave_time").unwrap().as_str().unwrap())
                .build()
        })
        .collect();
    let length_rows: Vec<Row> = trips
        .iter()
        .map(|r| {
            RowBuilder::new()
                .col("edge_id", r.get("edge_id").unwrap().as_int().unwrap())
                .col("start", r.get("start_coord").unwrap().as_pair().unwrap())
                .col("end", r.get("end_coord").unwrap().as_pair().unwrap())
                .build()
        })
        .collect();

    let mut inputs: Inputs = HashMap::new();
    inputs.extend(named_input("time", time_rows));
    inputs.extend(named_input("length", length_rows));

    let out = run(&yandex_maps_graph("time", "length"), inputs);
    assert!(!out.is_empty());
    for row in &out {
        assert!(row.get("speed").unwrap().as_float().unwrap() > 0.0);
        assert!(row.get("weekday").unwrap().as_str().is_some());
    }
}
