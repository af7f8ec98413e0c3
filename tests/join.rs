//! Sort-merge join: all four strategies, row-merge column-collision
//! suffixing, and the unknown-joiner failure path.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tabflow::error::Error;
use tabflow::graph::Graph;
use tabflow::join::{InnerJoiner, Joiner, LeftJoiner, OuterJoiner, RightJoiner};
use tabflow::row::Row;
use tabflow::source::{Inputs, SourceFactory};
use tabflow::testing::builders::RowBuilder;
use tabflow::testing::fixtures::{departments, employees};

fn named_input(name: &str, rows: Vec<Row>) -> Inputs {
    let mut inputs: Inputs = HashMap::new();
    let factory: SourceFactory = Arc::new(move || {
        let rows = rows.clone();
        Box::new(rows.into_iter().map(Ok))
    });
    inputs.insert(name.to_string(), factory);
    inputs
}

fn run_join(joiner: impl Joiner + 'static) -> Vec<Row> {
    let mut left = employees();
    left.sort_by(|a, b| a.cmp_by_keys(b, &["dept_id".to_string()]).unwrap());
    let mut right = departments();
    right.sort_by(|a, b| a.cmp_by_keys(b, &["dept_id".to_string()]).unwrap());

    let mut inputs: Inputs = HashMap::new();
    inputs.extend(named_input("employees", left));
    inputs.extend(named_input("departments", right));

    let graph = Graph::from_named_source("employees").join(
        joiner,
        Graph::from_named_source("departments"),
        ["dept_id"],
    );
    graph.run(inputs).collect::<Result<Vec<_>, _>>().expect("join should not fail")
}

#[test]
fn inner_join_drops_unmatched_rows_on_both_sides() {
    let out = run_join(InnerJoiner::new());
    // dept 3 (employees only) and dept 4 (departments only) are absent.
    assert!(out.iter().all(|r| r.get("dept_id").unwrap().as_int() != Some(3)));
    assert!(out.iter().all(|r| r.get("dept_id").unwrap().as_int() != Some(4)));
    assert!(out.iter().any(|r| r.get("dept_name").unwrap().as_str() == Some("engineering")));
}

#[test]
fn left_join_keeps_unmatched_left_rows_unmerged() {
    let out = run_join(LeftJoiner::new());
    let dept3: Vec<_> = out.iter().filter(|r| r.get("dept_id").unwrap().as_int() == Some(3)).collect();
    assert_eq!(dept3.len(), 1);
    assert!(!dept3[0].contains("dept_name"));
    assert!(out.iter().all(|r| r.get("dept_id").unwrap().as_int() != Some(4)));
}

#[test]
fn right_join_keeps_unmatched_right_rows_unmerged() {
    let out = run_join(RightJoiner::new());
    let dept4: Vec<_> = out.iter().filter(|r| r.get("dept_id").unwrap().as_int() == Some(4)).collect();
    assert_eq!(dept4.len(), 1);
    assert!(!dept4[0].contains("name"));
    assert!(out.iter().all(|r| r.get("dept_id").unwrap().as_int() != Some(3)));
}

#[test]
fn outer_join_keeps_both_unmatched_sides() {
    let out = run_join(OuterJoiner::new());
    assert!(out.iter().any(|r| r.get("dept_id").unwrap().as_int() == Some(3)));
    assert!(out.iter().any(|r| r.get("dept_id").unwrap().as_int() == Some(4)));
}

#[test]
fn column_collisions_are_suffixed_on_both_sides() {
    let left = vec![RowBuilder::new().col("id", 1).col("value", "left").build()];
    let right = vec![RowBuilder::new().col("id", 1).col("value", "right").build()];
    let mut inputs: Inputs = HashMap::new();
    inputs.extend(named_input("l", left));
    inputs.extend(named_input("r", right));

    let graph = Graph::from_named_source("l").join(InnerJoiner::new(), Graph::from_named_source("r"), ["id"]);
    let out: Vec<Row> = graph.run(inputs).collect::<Result<Vec<_>, _>>().unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].get("value_1").unwrap().as_str(), Some("left"));
    assert_eq!(out[0].get("value_2").unwrap().as_str(), Some("right"));
}

#[test]
fn custom_suffixes_are_honored() {
    let left = vec![RowBuilder::new().col("id", 1).col("value", "left").build()];
    let right = vec![RowBuilder::new().col("id", 1).col("value", "right").build()];
    let mut inputs: Inputs = HashMap::new();
    inputs.extend(named_input("l", left));
    inputs.extend(named_input("r", right));

    let joiner = InnerJoiner::with_suffixes("_left", "_right");
    let graph = Graph::from_named_source("l").join(joiner, Graph::from_named_source("r"), ["id"]);
    let out: Vec<Row> = graph.run(inputs).collect::<Result<Vec<_>, _>>().unwrap();

    assert_eq!(out[0].get("value_left").unwrap().as_str(), Some("left"));
    assert_eq!(out[0].get("value_right").unwrap().as_str(), Some("right"));
}

struct UnknownJoiner;
impl Joiner for UnknownJoiner {
    fn join(&self, _keys: &[String], left: &[Row], _right: &[Row]) -> Result<Vec<Row>, Error> {
        Ok(left.to_vec())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn an_unrecognized_joiner_fails_lazily_on_first_pull() {
    let left = vec![RowBuilder::new().col("id", 1).build()];
    let right = vec![RowBuilder::new().col("id", 1).build()];
    let mut inputs: Inputs = HashMap::new();
    inputs.extend(named_input("l", left));
    inputs.extend(named_input("r", right));

    let graph = Graph::from_named_source("l").join(UnknownJoiner, Graph::from_named_source("r"), ["id"]);
    let mut stream = graph.run(inputs);
    assert!(matches!(stream.next(), Some(Err(Error::UnknownJoinStrategy))));
}
