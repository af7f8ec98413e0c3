//! Fluent builders for constructing test rows.

use crate::row::Row;
use crate::value::Value;

/// A fluent builder for a single [`Row`].
///
/// # Example
///
/// ```
/// use tabflow::testing::RowBuilder;
///
/// let row = RowBuilder::new()
///     .col("name", "alice")
///     .col("age", 30)
///     .build();
/// assert_eq!(row.get("age").unwrap().as_int(), Some(30));
/// ```
#[derive(Default)]
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    #[must_use]
    pub fn new() -> Self {
        RowBuilder { row: Row::new() }
    }

    #[must_use]
    pub fn col(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.row.insert(name, value);
        self
    }

    #[must_use]
    pub fn build(self) -> Row {
        self.row
    }
}

/// A fluent builder for a `Vec<Row>`, useful for constructing an
/// in-memory input dataset for a graph run.
///
/// # Example
///
/// ```
/// use tabflow::testing::{RowBuilder, RowsBuilder};
///
/// let rows = RowsBuilder::new()
///     .row(RowBuilder::new().col("n", 1).build())
///     .row(RowBuilder::new().col("n", 2).build())
///     .build();
/// assert_eq!(rows.len(), 2);
/// ```
#[derive(Default)]
pub struct RowsBuilder {
    rows: Vec<Row>,
}

impl RowsBuilder {
    #[must_use]
    pub fn new() -> Self {
        RowsBuilder { rows: Vec::new() }
    }

    #[must_use]
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_builder_preserves_insertion_order() {
        let row = RowBuilder::new().col("b", 2).col("a", 1).build();
        let names: Vec<_> = row.names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
