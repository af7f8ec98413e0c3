//! Pre-built row datasets for common test scenarios.

use crate::row::Row;
use crate::testing::builders::RowBuilder;

/// Employee rows keyed by `dept_id`, for testing joins against
/// [`departments`].
///
/// # Example
///
/// ```
/// use tabflow::testing::fixtures::employees;
///
/// let rows = employees();
/// assert!(!rows.is_empty());
/// ```
#[must_use]
pub fn employees() -> Vec<Row> {
    vec![
        RowBuilder::new().col("dept_id", 1).col("name", "alice").build(),
        RowBuilder::new().col("dept_id", 1).col("name", "bob").build(),
        RowBuilder::new().col("dept_id", 2).col("name", "carol").build(),
        RowBuilder::new().col("dept_id", 3).col("name", "dave").build(),
    ]
}

/// Department rows keyed by `dept_id`, missing `dept_id` 3 on purpose
/// so left/right/outer join strategies have an unmatched side to chew on.
///
/// # Example
///
/// ```
/// use tabflow::testing::fixtures::departments;
///
/// let rows = departments();
/// assert!(rows.iter().all(|r| r.contains("dept_id")));
/// ```
#[must_use]
pub fn departments() -> Vec<Row> {
    vec![
        RowBuilder::new().col("dept_id", 1).col("dept_name", "engineering").build(),
        RowBuilder::new().col("dept_id", 2).col("dept_name", "sales").build(),
        RowBuilder::new().col("dept_id", 4).col("dept_name", "legal").build(),
    ]
}

/// Short text documents with a `doc_id` and a `text` column, for
/// word-count and TF-IDF style graphs.
///
/// # Example
///
/// ```
/// use tabflow::testing::fixtures::text_documents;
///
/// let docs = text_documents();
/// assert!(!docs.is_empty());
/// ```
#[must_use]
pub fn text_documents() -> Vec<Row> {
    vec![
        RowBuilder::new().col("doc_id", "doc1").col("text", "hello, world! hello again.").build(),
        RowBuilder::new().col("doc_id", "doc2").col("text", "the world of rust is hello-friendly").build(),
        RowBuilder::new().col("doc_id", "doc3").col("text", "rust programming, hello rust!").build(),
    ]
}

/// Timestamped GPS-trip rows (`edge_id`, `start`, `end`, start/end
/// coordinate pairs), for testing haversine distance and speed graphs.
///
/// # Example
///
/// ```
/// use tabflow::testing::fixtures::trip_rows;
///
/// let rows = trip_rows();
/// assert!(rows.iter().all(|r| r.contains("start_coord")));
/// ```
#[must_use]
pub fn trip_rows() -> Vec<Row> {
    vec![
        RowBuilder::new()
            .col("edge_id", 1)
            .col("enter_time", "20171020T112238.723000")
            .col("leave_time", "20171020T112238.900000")
            .col("start_coord", (37.84870, 55.73608))
            .col("end_coord", (37.84877, 55.73605))
            .build(),
        RowBuilder::new()
            .col("edge_id", 1)
            .col("enter_time", "20171011T145553.040000")
            .col("leave_time", "20171011T145553.200000")
            .col("start_coord", (37.84870, 55.73608))
            .col("end_coord", (37.84877, 55.73605))
            .build(),
        RowBuilder::new()
            .col("edge_id", 2)
            .col("enter_time", "20171020T090000.000000")
            .col("leave_time", "20171020T090010.000000")
            .col("start_coord", (37.53758, 55.84149))
            .col("end_coord", (37.53744, 55.84148))
            .build(),
    ]
}
