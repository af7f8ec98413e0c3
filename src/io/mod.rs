//! Wire encodings for rows, used both by `Graph::from_file` and by the
//! illustrative `src/bin/` tools.
//!
//! Trimmed to what a single-threaded engine needs: no sharding, no
//! parallel writer, no parquet/avro/compression/glob support.

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;
