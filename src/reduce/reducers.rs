//! Built-in reducers (§4.4).

use std::collections::HashMap;

use crate::error::Error;
use crate::reduce::Reducer;
use crate::row::Row;
use crate::value::Value;

fn key_row(keys: &[String], source: &Row) -> Result<Row, Error> {
    let mut out = Row::new();
    for key in keys {
        out.insert(key.clone(), source.get_required(key)?.clone());
    }
    Ok(out)
}

/// Emits the first row of the group unchanged.
pub struct First;

impl Reducer for First {
    fn reduce(&self, _keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error> {
        Ok(group.into_iter().take(1).collect())
    }
}

/// Emits the `n` rows of the group with the largest values of `column`,
/// descending, ties broken by insertion order (stable among equals).
pub struct TopN {
    pub column: String,
    pub n: usize,
}

impl TopN {
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        TopN { column: column.into(), n }
    }
}

impl Reducer for TopN {
    fn reduce(&self, _keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error> {
        let mut indexed: Vec<(usize, Row)> = group.into_iter().enumerate().collect();
        let mut error = None;
        indexed.sort_by(|(ia, a), (ib, b)| {
            if error.is_some() {
                return std::cmp::Ordering::Equal;
            }
            let cmp = (|| -> Result<std::cmp::Ordering, Error> {
                let va = a.get_required(&self.column)?;
                let vb = b.get_required(&self.column)?;
                Ok(va.natural_cmp(vb)?.reverse())
            })();
            match cmp {
                Ok(std::cmp::Ordering::Equal) => ia.cmp(ib),
                Ok(ord) => ord,
                Err(e) => {
                    error = Some(e);
                    std::cmp::Ordering::Equal
                }
            }
        });
        if let Some(e) = error {
            return Err(e);
        }
        Ok(indexed.into_iter().take(self.n).map(|(_, row)| row).collect())
    }
}

/// Emits one row with the group-key columns and `column = count(group)`.
pub struct Count {
    pub column: String,
}

impl Count {
    pub fn new(column: impl Into<String>) -> Self {
        Count { column: column.into() }
    }
}

impl Reducer for Count {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error> {
        let Some(first) = group.first() else {
            return Ok(vec![]);
        };
        let mut out = key_row(keys, first)?;
        out.insert(self.column.clone(), group.len() as i64);
        Ok(vec![out])
    }
}

/// Emits one row with the group-key columns and `column = sum(column)`
/// across the group.
pub struct Sum {
    pub column: String,
}

impl Sum {
    pub fn new(column: impl Into<String>) -> Self {
        Sum { column: column.into() }
    }
}

impl Reducer for Sum {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error> {
        let Some(first) = group.first() else {
            return Ok(vec![]);
        };
        let mut out = key_row(keys, first)?;
        let mut sum = 0.0_f64;
        let mut all_int = true;
        let mut int_sum = 0_i64;
        for row in &group {
            match row.get_required(&self.column)? {
                Value::Int(v) => {
                    int_sum += v;
                    sum += *v as f64;
                }
                other => {
                    all_int = false;
                    sum += other.as_float().ok_or_else(|| {
                        Error::Column(format!("column `{}` is not numeric", self.column))
                    })?;
                }
            }
        }
        if all_int {
            out.insert(self.column.clone(), int_sum);
        } else {
            out.insert(self.column.clone(), sum);
        }
        Ok(vec![out])
    }
}

/// Within each group, computes the frequency of each distinct value of
/// `words_column` as `count / group_size`; emits one row per distinct
/// value with the group-key columns, the word, and its frequency.
pub struct TermFrequency {
    pub words_column: String,
    pub result_column: String,
}

impl TermFrequency {
    pub fn new(words_column: impl Into<String>, result_column: impl Into<String>) -> Self {
        TermFrequency {
            words_column: words_column.into(),
            result_column: result_column.into(),
        }
    }
}

impl Reducer for TermFrequency {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>, Error> {
        let Some(first) = group.first() else {
            return Ok(vec![]);
        };
        let base = key_row(keys, first)?;
        let total = group.len() as f64;

        let mut counts: HashMap<String, i64> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for row in &group {
            let word = row.get_required(&self.words_column)?.to_string();
            let entry = counts.entry(word.clone()).or_insert_with(|| {
                order.push(word.clone());
                0
            });
            *entry += 1;
        }

        let mut out = Vec::with_capacity(order.len());
        for word in order {
            let count = counts[&word];
            let mut row = base.clone();
            row.insert(self.words_column.clone(), word);
            row.insert(self.result_column.clone(), count as f64 / total);
            out.push(row);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        let mut r = Row::new();
        for (name, value) in pairs {
            r.insert(*name, value.clone());
        }
        r
    }

    #[test]
    fn count_emits_exact_group_size() {
        let group = vec![
            row(&[("text", Value::Str("a".into()))]),
            row(&[("text", Value::Str("a".into()))]),
            row(&[("text", Value::Str("a".into()))]),
        ];
        let keys = vec!["text".to_string()];
        let out = Count::new("count").reduce(&keys, group).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("count").unwrap().as_int(), Some(3));
    }

    #[test]
    fn term_frequency_sums_to_one() {
        let group = vec![
            row(&[("doc_id", Value::Int(1)), ("word", Value::Str("a".into()))]),
            row(&[("doc_id", Value::Int(1)), ("word", Value::Str("b".into()))]),
            row(&[("doc_id", Value::Int(1)), ("word", Value::Str("a".into()))]),
        ];
        let keys = vec!["doc_id".to_string()];
        let out = TermFrequency::new("word", "tf").reduce(&keys, group).unwrap();
        let total: f64 = out.iter().map(|r| r.get("tf").unwrap().as_float().unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn top_n_breaks_ties_by_insertion_order() {
        let group = vec![
            row(&[("v", Value::Int(5)), ("tag", Value::Str("first".into()))]),
            row(&[("v", Value::Int(5)), ("tag", Value::Str("second".into()))]),
            row(&[("v", Value::Int(1)), ("tag", Value::Str("third".into()))]),
        ];
        let out = TopN::new("v", 2).reduce(&[], group).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("tag").unwrap().as_str(), Some("first"));
        assert_eq!(out[1].get("tag").unwrap().as_str(), Some("second"));
    }
}
