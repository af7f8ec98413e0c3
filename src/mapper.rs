//! The `Map` operator's row-level transformation contract.

pub mod library;

use crate::error::Error;
use crate::row::Row;

/// A pure function from one row to zero or more rows. The same
/// mechanism backs filtering (return 0 or 1) and splitting (return N).
///
/// Single required method, per the "closures or small structs" design
/// note: any `Fn(Row) -> Result<Vec<Row>, Error>` implements this via
/// the blanket impl below, so ad-hoc mappers don't need a named type.
pub trait Mapper: Send + Sync {
    fn map(&self, row: Row) -> Result<Vec<Row>, Error>;
}

impl<F> Mapper for F
where
    F: Fn(Row) -> Result<Vec<Row>, Error> + Send + Sync,
{
    fn map(&self, row: Row) -> Result<Vec<Row>, Error> {
        self(row)
    }
}
