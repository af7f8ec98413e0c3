//! The dynamic value type rows are built out of.

use std::cmp::Ordering;
use std::fmt;

use ordered_float::NotNan;

use crate::error::Error;
use crate::row::Row;

/// A single cell's worth of data. Closed on purpose: the engine never
/// needs to invent new tags at runtime, only interpret the ones below.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// A coordinate pair, `(longitude, latitude)` by convention of the
    /// mappers that produce/consume it.
    Pair(f64, f64),
    /// A nested row, used by operators that group or join sub-records.
    Row(Row),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            Value::Pair(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Value::Row(r) => Some(r),
            _ => None,
        }
    }

    /// A short tag naming this value's variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Pair(..) => "pair",
            Value::Row(_) => "row",
        }
    }

    /// Compares two values of the same variant. Values of different
    /// variants are not orderable against each other: the caller must
    /// decide what that means (usually `Error::Column`), since mixing
    /// types under one column name is itself the anomaly.
    pub fn natural_cmp(&self, other: &Value) -> Result<Ordering, Error> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => {
                let a = NotNan::new(*a).map_err(|_| Error::Column("NaN is not orderable".into()))?;
                let b = NotNan::new(*b).map_err(|_| Error::Column("NaN is not orderable".into()))?;
                Ok(a.cmp(&b))
            }
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (a, b) => Err(Error::Column(format!(
                "cannot compare `{}` with `{}`",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Pair(a, b) => write!(f, "({a}, {b})"),
            Value::Row(r) => write!(f, "{r:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<Row> for Value {
    fn from(v: Row) -> Self {
        Value::Row(v)
    }
}

impl From<(f64, f64)> for Value {
    fn from((a, b): (f64, f64)) -> Self {
        Value::Pair(a, b)
    }
}
