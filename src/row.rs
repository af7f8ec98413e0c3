//! Order-preserving, name-unique rows.

use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;
use crate::value::Value;

/// One record flowing through a graph: a sequence of uniquely-named
/// columns, in insertion order. Column order is preserved because
/// several mappers (`Project`, row-merge) are order-sensitive, and
/// because preserving it makes output deterministic and easy to eyeball.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row { columns: Vec::new() }
    }

    /// Inserts or replaces a column. Replacing keeps the column's
    /// original position; inserting a new name appends it.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.columns.push((name, value));
        }
        self
    }

    /// Builder-style insert, consuming and returning `self`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_required(&self, name: &str) -> Result<&Value, Error> {
        self.get(name)
            .ok_or_else(|| Error::Column(format!("missing column `{name}`")))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        if let Some(pos) = self.columns.iter().position(|(n, _)| n == name) {
            Some(self.columns.remove(pos).1)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Projects this row onto a subset of columns, in the order given.
    /// Missing columns produce `Error::Column`.
    pub fn project(&self, names: &[String]) -> Result<Row, Error> {
        let mut out = Row::new();
        for name in names {
            let value = self.get_required(name)?;
            out.insert(name.clone(), value.clone());
        }
        Ok(out)
    }

    /// Compares two rows on a shared key column list, in order, using
    /// `Value::natural_cmp`. Used by the external sort and by sort-merge
    /// join to detect key-group boundaries.
    pub fn cmp_by_keys(&self, other: &Row, keys: &[String]) -> Result<Ordering, Error> {
        for key in keys {
            let a = self.get_required(key)?;
            let b = other.get_required(key)?;
            match a.natural_cmp(b)? {
                Ordering::Equal => continue,
                ord => return Ok(ord),
            }
        }
        Ok(Ordering::Equal)
    }

    pub fn key_equal(&self, other: &Row, keys: &[String]) -> Result<bool, Error> {
        Ok(self.cmp_by_keys(other, keys)? == Ordering::Equal)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}
