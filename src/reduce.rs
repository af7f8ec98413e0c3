//! The `Reduce` operator: per-group row-sequence transformation over a
//! pre-sorted stream.

pub mod reducers;

use crate::error::Error;
use crate::row::Row;

/// Invoked once per maximal contiguous group of equal-key rows.
/// `keys` is the configured key-column list (not the group's values);
/// reducers that need the group's key values read them off the first
/// row in `group`.
pub trait Reducer: Send + Sync {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error>;
}

impl<F> Reducer for F
where
    F: Fn(&[String], Vec<Row>) -> Result<Vec<Row>, Error> + Send + Sync,
{
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error> {
        self(keys, group)
    }
}

/// Groups a key-sorted stream into maximal contiguous equal-key runs and
/// feeds each one to `reducer`, in order. Group boundaries are detected
/// by strict inequality on the key tuple against the previous row —
/// this operator trusts the upstream `Sort`, it does not re-check it.
pub struct GroupedReduce<I> {
    input: std::iter::Peekable<I>,
    keys: Vec<String>,
    reducer: std::sync::Arc<dyn Reducer>,
    pending: std::vec::IntoIter<Row>,
    done: bool,
}

impl<I> GroupedReduce<I>
where
    I: Iterator<Item = Result<Row, Error>>,
{
    pub fn new(input: I, keys: Vec<String>, reducer: std::sync::Arc<dyn Reducer>) -> Self {
        GroupedReduce {
            input: input.peekable(),
            keys,
            reducer,
            pending: Vec::new().into_iter(),
            done: false,
        }
    }

    fn next_group(&mut self) -> Option<Result<Vec<Row>, Error>> {
        let first = match self.input.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        let mut group = vec![first];
        loop {
            let same_key = match self.input.peek() {
                None => false,
                Some(Ok(next_row)) => match group[0].key_equal(next_row, &self.keys) {
                    Ok(same) => same,
                    Err(e) => return Some(Err(e)),
                },
                Some(Err(_)) => false,
            };
            if !same_key {
                break;
            }
            match self.input.next() {
                Some(Ok(row)) => group.push(row),
                Some(Err(e)) => return Some(Err(e)),
                None => break,
            }
        }
        Some(Ok(group))
    }
}

impl<I> Iterator for GroupedReduce<I>
where
    I: Iterator<Item = Result<Row, Error>>,
{
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            match self.next_group() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(group)) => match self.reducer.reduce(&self.keys, group) {
                    Ok(out) => {
                        self.pending = out.into_iter();
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}
