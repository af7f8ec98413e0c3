//! Testing utilities: row builders, fixtures, and assertions for
//! writing tests against graphs.
//!
//! # Example
//!
//! ```
//! use tabflow::testing::builders::{RowBuilder, RowsBuilder};
//! use tabflow::testing::assert_rows_unordered_equal;
//!
//! let rows = RowsBuilder::new()
//!     .row(RowBuilder::new().col("n", 1).build())
//!     .row(RowBuilder::new().col("n", 2).build())
//!     .build();
//! assert_rows_unordered_equal(&rows, &rows.clone());
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;

use crate::error::Error;
use crate::mapper::Mapper;
use crate::row::Row;

/// A `Mapper` that passes every row through unchanged, logging it at
/// `debug` level with a caller-supplied label first. The dynamic-row
/// analogue of a pipeline's `debug_inspect` combinator.
pub struct DebugInspect {
    label: String,
}

impl DebugInspect {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        DebugInspect { label: label.into() }
    }
}

impl Mapper for DebugInspect {
    fn map(&self, row: Row) -> Result<Vec<Row>, Error> {
        log::debug!("[{}] {row}", self.label);
        Ok(vec![row])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_inspect_passes_rows_through() {
        let row = builders::RowBuilder::new().col("x", 1).build();
        let out = DebugInspect::new("test").map(row.clone()).unwrap();
        assert_eq!(out, vec![row]);
    }
}
