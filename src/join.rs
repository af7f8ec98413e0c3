//! The `Join` operator: sort-merge join over co-sorted key-grouped
//! streams, with row-merge column-collision suffixing (§4.6).

use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::row::Row;
use crate::source::RowStream;

/// Given join keys and two co-keyed groups, produces merged rows.
///
/// The engine only recognizes the four concrete strategies below
/// (checked via `as_any`/`downcast_ref`, the Rust analogue of the
/// original's `isinstance` dispatch); any other implementation is an
/// "unknown" joiner and fails lazily with `Error::UnknownJoinStrategy`
/// on the first pull.
pub trait Joiner: Send + Sync {
    fn suffix_a(&self) -> &str {
        "_1"
    }
    fn suffix_b(&self) -> &str {
        "_2"
    }

    fn join(&self, keys: &[String], left: &[Row], right: &[Row]) -> Result<Vec<Row>, Error>;

    fn as_any(&self) -> &dyn Any;
}

/// Row-merge semantics shared by every matched pair, across all four
/// strategies (§4.6 "Row-merge semantics").
pub fn merge_rows(keys: &[String], a: &Row, b: &Row, suffix_a: &str, suffix_b: &str) -> Result<Row, Error> {
    let mut out = Row::new();
    for key in keys {
        out.insert(key.clone(), a.get_required(key)?.clone());
    }

    let common: Vec<&str> = a
        .names()
        .filter(|n| !keys.iter().any(|k| k == n) && b.contains(n))
        .collect();

    for col in &common {
        out.insert(format!("{col}{suffix_a}"), a.get_required(col)?.clone());
        out.insert(format!("{col}{suffix_b}"), b.get_required(col)?.clone());
    }

    for (name, value) in a.iter() {
        if keys.iter().any(|k| k == name) || common.contains(&name) {
            continue;
        }
        out.insert(name.to_string(), value.clone());
    }
    for (name, value) in b.iter() {
        if keys.iter().any(|k| k == name) || common.contains(&name) {
            continue;
        }
        out.insert(name.to_string(), value.clone());
    }

    Ok(out)
}

macro_rules! joiner_boilerplate {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                $name {
                    suffix_a: "_1".to_string(),
                    suffix_b: "_2".to_string(),
                }
            }

            pub fn with_suffixes(a: impl Into<String>, b: impl Into<String>) -> Self {
                $name {
                    suffix_a: a.into(),
                    suffix_b: b.into(),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Matched keys: merge Cartesian product. Left-only: drop. Right-only: drop.
pub struct InnerJoiner {
    suffix_a: String,
    suffix_b: String,
}
joiner_boilerplate!(InnerJoiner);

impl Joiner for InnerJoiner {
    fn suffix_a(&self) -> &str {
        &self.suffix_a
    }
    fn suffix_b(&self) -> &str {
        &self.suffix_b
    }

    fn join(&self, keys: &[String], left: &[Row], right: &[Row]) -> Result<Vec<Row>, Error> {
        let mut out = Vec::with_capacity(left.len() * right.len());
        for a in left {
            for b in right {
                out.push(merge_rows(keys, a, b, &self.suffix_a, &self.suffix_b)?);
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matched keys: merge Cartesian product. Left-only: emit A rows
/// unmerged. Right-only: drop.
pub struct LeftJoiner {
    suffix_a: String,
    suffix_b: String,
}
joiner_boilerplate!(LeftJoiner);

impl Joiner for LeftJoiner {
    fn suffix_a(&self) -> &str {
        &self.suffix_a
    }
    fn suffix_b(&self) -> &str {
        &self.suffix_b
    }

    fn join(&self, keys: &[String], left: &[Row], right: &[Row]) -> Result<Vec<Row>, Error> {
        if right.is_empty() {
            return Ok(left.to_vec());
        }
        let mut out = Vec::with_capacity(left.len() * right.len());
        for a in left {
            for b in right {
                out.push(merge_rows(keys, a, b, &self.suffix_a, &self.suffix_b)?);
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matched keys: merge Cartesian product. Left-only: drop. Right-only:
/// emit B rows unmerged.
pub struct RightJoiner {
    suffix_a: String,
    suffix_b: String,
}
joiner_boilerplate!(RightJoiner);

impl Joiner for RightJoiner {
    fn suffix_a(&self) -> &str {
        &self.suffix_a
    }
    fn suffix_b(&self) -> &str {
        &self.suffix_b
    }

    fn join(&self, keys: &[String], left: &[Row], right: &[Row]) -> Result<Vec<Row>, Error> {
        if left.is_empty() {
            return Ok(right.to_vec());
        }
        let mut out = Vec::with_capacity(left.len() * right.len());
        for a in left {
            for b in right {
                out.push(merge_rows(keys, a, b, &self.suffix_a, &self.suffix_b)?);
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matched keys: merge Cartesian product. Left-only: emit A rows
/// unmerged. Right-only: emit B rows unmerged.
pub struct OuterJoiner {
    suffix_a: String,
    suffix_b: String,
}
joiner_boilerplate!(OuterJoiner);

impl Joiner for OuterJoiner {
    fn suffix_a(&self) -> &str {
        &self.suffix_a
    }
    fn suffix_b(&self) -> &str {
        &self.suffix_b
    }

    fn join(&self, keys: &[String], left: &[Row], right: &[Row]) -> Result<Vec<Row>, Error> {
        if right.is_empty() {
            return Ok(left.to_vec());
        }
        if left.is_empty() {
            return Ok(right.to_vec());
        }
        let mut out = Vec::with_capacity(left.len() * right.len());
        for a in left {
            for b in right {
                out.push(merge_rows(keys, a, b, &self.suffix_a, &self.suffix_b)?);
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// True when `joiner` is one of the four strategies the executor can
/// recognize.
fn is_recognized(joiner: &dyn Joiner) -> bool {
    let any = joiner.as_any();
    any.downcast_ref::<InnerJoiner>().is_some()
        || any.downcast_ref::<LeftJoiner>().is_some()
        || any.downcast_ref::<RightJoiner>().is_some()
        || any.downcast_ref::<OuterJoiner>().is_some()
}

/// Drives the sort-merge walk described in §4.6 over two co-sorted
/// streams, grouping each side by `keys` and handing matched/unmatched
/// groups to `joiner`.
pub fn merge_join(
    left: RowStream,
    right: RowStream,
    keys: Vec<String>,
    joiner: Arc<dyn Joiner>,
) -> RowStream {
    if !is_recognized(joiner.as_ref()) {
        return Box::new(std::iter::once(Err(Error::UnknownJoinStrategy)));
    }
    Box::new(MergeJoin {
        left: left.peekable(),
        right: right.peekable(),
        keys,
        joiner,
        left_buf: None,
        left_done: false,
        right_buf: None,
        right_done: false,
        pending: Vec::new().into_iter(),
        finished: false,
    })
}

struct MergeJoin {
    left: std::iter::Peekable<RowStream>,
    right: std::iter::Peekable<RowStream>,
    keys: Vec<String>,
    joiner: Arc<dyn Joiner>,
    left_buf: Option<Vec<Row>>,
    left_done: bool,
    right_buf: Option<Vec<Row>>,
    right_done: bool,
    pending: std::vec::IntoIter<Row>,
    finished: bool,
}

impl MergeJoin {
    fn take_group(side: &mut std::iter::Peekable<RowStream>, keys: &[String]) -> Option<Result<Vec<Row>, Error>> {
        let first = match side.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        let mut group = vec![first];
        loop {
            let same = match side.peek() {
                None => false,
                Some(Err(_)) => false,
                Some(Ok(next)) => match group[0].key_equal(next, keys) {
                    Ok(v) => v,
                    Err(e) => return Some(Err(e)),
                },
            };
            if !same {
                break;
            }
            match side.next() {
                Some(Ok(row)) => group.push(row),
                Some(Err(e)) => return Some(Err(e)),
                None => break,
            }
        }
        Some(Ok(group))
    }

    /// Fills `left_buf`/`right_buf` if empty and that side isn't
    /// exhausted yet. Buffers persist across steps: a group that's
    /// "ahead" of the other side stays put until the other side catches
    /// up, rather than being consumed and lost.
    fn refill(&mut self) -> Result<(), Error> {
        if self.left_buf.is_none() && !self.left_done {
            match Self::take_group(&mut self.left, &self.keys) {
                None => self.left_done = true,
                Some(Ok(g)) => self.left_buf = Some(g),
                Some(Err(e)) => return Err(e),
            }
        }
        if self.right_buf.is_none() && !self.right_done {
            match Self::take_group(&mut self.right, &self.keys) {
                None => self.right_done = true,
                Some(Ok(g)) => self.right_buf = Some(g),
                Some(Err(e)) => return Err(e),
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Option<Result<Vec<Row>, Error>> {
        if let Err(e) = self.refill() {
            return Some(Err(e));
        }

        match (&self.left_buf, &self.right_buf) {
            (None, None) => None,
            (Some(_), None) => {
                let lg = self.left_buf.take().unwrap();
                Some(self.joiner.join(&self.keys, &lg, &[]))
            }
            (None, Some(_)) => {
                let rg = self.right_buf.take().unwrap();
                Some(self.joiner.join(&self.keys, &[], &rg))
            }
            (Some(lg), Some(rg)) => {
                let ord = match lg[0].cmp_by_keys(&rg[0], &self.keys) {
                    Ok(o) => o,
                    Err(e) => return Some(Err(e)),
                };
                use std::cmp::Ordering::*;
                match ord {
                    Equal => {
                        let lg = self.left_buf.take().unwrap();
                        let rg = self.right_buf.take().unwrap();
                        Some(self.joiner.join(&self.keys, &lg, &rg))
                    }
                    Less => {
                        let lg = self.left_buf.take().unwrap();
                        Some(self.joiner.join(&self.keys, &lg, &[]))
                    }
                    Greater => {
                        let rg = self.right_buf.take().unwrap();
                        Some(self.joiner.join(&self.keys, &[], &rg))
                    }
                }
            }
        }
    }
}

impl Iterator for MergeJoin {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if self.finished {
                return None;
            }
            match self.step() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                Some(Ok(rows)) => self.pending = rows.into_iter(),
            }
        }
    }
}
