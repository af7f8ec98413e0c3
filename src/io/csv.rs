//! CSV row encoding (feature `io-csv`), demonstrating that
//! `Graph::from_file`'s parser is genuinely pluggable, not JSON-only.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;
use crate::row::Row;
use crate::source::{RowStream, SourceFactory};
use crate::value::Value;

fn value_from_field(field: &str) -> Value {
    if let Ok(i) = field.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return Value::Float(f);
    }
    if field.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::Str(field.to_string())
}

fn open(path: &Path) -> Result<RowStream, Error> {
    let file = File::open(path).map_err(|e| Error::io(path.to_path_buf(), e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let path_for_err = path.to_path_buf();
    let records = reader.into_records();
    Ok(Box::new(records.map(move |record| {
        let record = record.map_err(|e| {
            Error::io(path_for_err.clone(), std::io::Error::other(e.to_string()))
        })?;
        let mut row = Row::new();
        for (name, field) in headers.iter().zip(record.iter()) {
            row.insert(name.clone(), value_from_field(field));
        }
        Ok(row)
    })))
}

/// Builds a restartable factory that re-reads `path` from the top on
/// every call, suitable for binding under a named input (including the
/// right-hand side of a re-run `Join` sub-graph).
pub fn source_factory(path: impl Into<PathBuf>) -> SourceFactory {
    let path = path.into();
    Arc::new(move || match open(&path) {
        Ok(stream) => stream,
        Err(e) => Box::new(std::iter::once(Err(e))),
    })
}

/// Collects a row stream into a CSV file. The header is taken from the
/// first row's column names; subsequent rows are expected to share it.
pub fn write_file(path: impl AsRef<Path>, mut rows: impl Iterator<Item = Result<Row, Error>>) -> Result<usize, Error> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path.to_path_buf(), e))?;
    let mut writer = csv::Writer::from_writer(file);
    let mut count = 0;

    let Some(first) = rows.next() else {
        return Ok(0);
    };
    let first = first?;
    let headers: Vec<String> = first.names().map(str::to_string).collect();
    writer
        .write_record(&headers)
        .map_err(|e| Error::Parse(e.to_string()))?;
    write_row(&mut writer, &first, &headers)?;
    count += 1;

    for row in rows {
        let row = row?;
        write_row(&mut writer, &row, &headers)?;
        count += 1;
    }
    writer.flush().map_err(|e| Error::io(path.to_path_buf(), e))?;
    Ok(count)
}

fn write_row<W: std::io::Write>(writer: &mut csv::Writer<W>, row: &Row, headers: &[String]) -> Result<(), Error> {
    let fields: Vec<String> = headers
        .iter()
        .map(|h| row.get(h).map(|v| v.to_string()).unwrap_or_default())
        .collect();
    writer
        .write_record(&fields)
        .map_err(|e| Error::Parse(e.to_string()))
}
