//! Assertion functions for comparing row collections in tests.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::row::Row;

/// Asserts that two row sequences are equal, in order.
///
/// # Panics
///
/// Panics on the first differing index, or on a length mismatch.
pub fn assert_rows_equal(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "row count mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            rowmap(a),
            rowmap(e),
            "row mismatch at index {i}:\n  expected: {e:?}\n  actual:   {a:?}"
        );
    }
}

/// Asserts that two row sequences contain the same rows, ignoring order.
///
/// Rows are compared by their column/value content, not by position;
/// duplicate rows are counted, so `[a, a]` and `[a]` are not equal.
///
/// # Panics
///
/// Panics if the multisets of rows differ.
pub fn assert_rows_unordered_equal(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "row count mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    let mut actual_maps: Vec<_> = actual.iter().map(rowmap).collect();
    let mut expected_maps: Vec<_> = expected.iter().map(rowmap).collect();
    actual_maps.sort();
    expected_maps.sort();
    assert_eq!(
        actual_maps, expected_maps,
        "row content mismatch (order-independent):\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
}

/// Asserts that, once grouped by `keys`, `actual` and `expected` have the
/// same set of keys and, for each key, the same multiset of rows. Meant
/// for checking the output of a `Reduce` or a sort-merge `Join` where
/// group-internal order is not significant.
///
/// # Panics
///
/// Panics if the grouped content differs.
pub fn assert_row_groups_equal_by_key(actual: &[Row], expected: &[Row], keys: &[&str]) {
    let actual_groups = group_by_keys(actual, keys);
    let expected_groups = group_by_keys(expected, keys);
    assert_eq!(
        actual_groups.keys().collect::<std::collections::BTreeSet<_>>(),
        expected_groups.keys().collect::<std::collections::BTreeSet<_>>(),
        "group keys differ"
    );
    for (key, expected_rows) in &expected_groups {
        let actual_rows = actual_groups.get(key).expect("checked above");
        assert_rows_unordered_equal(actual_rows, expected_rows);
    }
}

fn rowmap(row: &Row) -> Vec<(String, String)> {
    row.iter().map(|(name, value)| (name.clone(), value.to_string())).collect()
}

fn group_by_keys(rows: &[Row], keys: &[&str]) -> HashMap<Vec<String>, Vec<Row>> {
    let mut groups: HashMap<Vec<String>, Vec<Row>> = HashMap::new();
    for row in rows {
        let key: Vec<String> = keys
            .iter()
            .map(|k| row.get(k).map(ToString::to_string).unwrap_or_default())
            .collect();
        groups.entry(key).or_default().push(row.clone());
    }
    groups
}

/// Asserts that all rows satisfy a predicate.
///
/// # Panics
///
/// Panics on the first row that fails `predicate`.
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    for (i, item) in collection.iter().enumerate() {
        assert!(predicate(item), "predicate failed at index {i}: {item:?}");
    }
}
