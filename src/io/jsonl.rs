//! JSON-per-line row encoding, the default wire format (§6.1).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value as Json;

use crate::error::Error;
use crate::row::Row;
use crate::source::{LineParser, RowStream};
use crate::value::Value;

/// Converts one JSON object into a `Row`. Nested objects become
/// `Value::Row`; arrays of exactly two numbers become `Value::Pair`
/// (the coordinate convention used by `Haversine` and friends);
/// other arrays are not representable and produce `Error::Parse`.
pub fn json_to_row(json: Json) -> Result<Row, Error> {
    let Json::Object(map) = json else {
        return Err(Error::Parse("expected a JSON object per line".to_string()));
    };
    let mut row = Row::new();
    for (name, value) in map {
        row.insert(name, json_to_value(value)?);
    }
    Ok(row)
}

fn json_to_value(json: Json) -> Result<Value, Error> {
    match json {
        Json::Null => Err(Error::Parse("null values are not supported".to_string())),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(Error::Parse(format!("number out of range: {n}")))
            }
        }
        Json::String(s) => Ok(Value::Str(s)),
        Json::Array(items) => {
            if items.len() == 2 {
                if let (Some(a), Some(b)) = (items[0].as_f64(), items[1].as_f64()) {
                    return Ok(Value::Pair(a, b));
                }
            }
            Err(Error::Parse(
                "arrays are only supported as 2-element numeric pairs".to_string(),
            ))
        }
        Json::Object(map) => {
            let mut row = Row::new();
            for (name, value) in map {
                row.insert(name, json_to_value(value)?);
            }
            Ok(Value::Row(row))
        }
    }
}

pub fn row_to_json(row: &Row) -> Json {
    let mut map = serde_json::Map::new();
    for (name, value) in row.iter() {
        map.insert(name.to_string(), value_to_json(value));
    }
    Json::Object(map)
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Int(v) => Json::Number((*v).into()),
        Value::Float(v) => serde_json::Number::from_f64(*v)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Bool(v) => Json::Bool(*v),
        Value::Str(v) => Json::String(v.clone()),
        Value::Pair(a, b) => Json::Array(vec![
            serde_json::Number::from_f64(*a).map(Json::Number).unwrap_or(Json::Null),
            serde_json::Number::from_f64(*b).map(Json::Number).unwrap_or(Json::Null),
        ]),
        Value::Row(r) => row_to_json(r),
    }
}

/// A `LineParser` that decodes one JSON object per line.
pub fn parser() -> LineParser {
    Arc::new(|line: &str| -> Result<Row, Error> {
        let json: Json = serde_json::from_str(line).map_err(|e| Error::Parse(e.to_string()))?;
        json_to_row(json)
    })
}

/// Turns a buffered reader into a lazy row stream, one JSON object per
/// non-empty line. Used both for regular file sources and to read back
/// a sort's spill files.
pub fn lines<R>(reader: BufReader<R>, path: PathBuf) -> Box<dyn Iterator<Item = Result<Row, Error>> + Send>
where
    R: std::io::Read + Send + 'static,
{
    Box::new(reader.lines().filter_map(move |line| {
        let line = match line {
            Ok(l) => l,
            Err(e) => return Some(Err(Error::io(path.clone(), e))),
        };
        if line.trim().is_empty() {
            return None;
        }
        let json: Json = match serde_json::from_str(&line) {
            Ok(j) => j,
            Err(e) => return Some(Err(Error::Parse(e.to_string()))),
        };
        Some(json_to_row(json))
    }))
}

/// Opens `path` and streams it as JSONL rows.
pub fn read_file(path: impl AsRef<Path>) -> RowStream {
    let path = path.as_ref().to_path_buf();
    match File::open(&path) {
        Ok(file) => lines(BufReader::new(file), path),
        Err(e) => Box::new(std::iter::once(Err(Error::io(path, e)))),
    }
}

/// Collects a row stream into a JSONL file, one object per line.
pub fn write_file(path: impl AsRef<Path>, rows: impl Iterator<Item = Result<Row, Error>>) -> Result<usize, Error> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;
    for row in rows {
        let row = row?;
        serde_json::to_writer(&mut writer, &row_to_json(&row))
            .map_err(|e| Error::Parse(e.to_string()))?;
        writer
            .write_all(b"\n")
            .map_err(|e| Error::io(path.to_path_buf(), e))?;
        count += 1;
    }
    writer.flush().map_err(|e| Error::io(path.to_path_buf(), e))?;
    Ok(count)
}
