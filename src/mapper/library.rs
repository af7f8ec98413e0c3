//! Built-in row-level mappers (§6.2).

use chrono::{Datelike, Timelike};

use crate::error::Error;
use crate::mapper::Mapper;
use crate::row::Row;
use crate::timeparse::{parse_timestamp, weekday_abbrev, weekday_index};
use crate::value::Value;

/// Yields the row unchanged.
pub struct Identity;

impl Mapper for Identity {
    fn map(&self, row: Row) -> Result<Vec<Row>, Error> {
        Ok(vec![row])
    }
}

/// Retains only the named columns that are present; absent ones are
/// silently skipped.
pub struct Project {
    pub columns: Vec<String>,
}

impl Project {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Project {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Mapper for Project {
    fn map(&self, row: Row) -> Result<Vec<Row>, Error> {
        let mut out = Row::new();
        for name in &self.columns {
            if let Some(value) = row.get(name) {
                out.insert(name.clone(), value.clone());
            }
        }
        Ok(vec![out])
    }
}

/// Removes `from` and re-inserts its value under `to`, when present.
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Rename {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Mapper for Rename {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(value) = row.remove(&self.from) {
            row.insert(self.to.clone(), value);
        }
        Ok(vec![row])
    }
}

/// Yields the row only when `predicate` returns true.
pub struct Filter<F> {
    pub predicate: F,
}

impl<F> Filter<F>
where
    F: Fn(&Row) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Filter { predicate }
    }
}

impl<F> Mapper for Filter<F>
where
    F: Fn(&Row) -> bool + Send + Sync,
{
    fn map(&self, row: Row) -> Result<Vec<Row>, Error> {
        if (self.predicate)(&row) {
            Ok(vec![row])
        } else {
            Ok(vec![])
        }
    }
}

/// Removes ASCII punctuation characters from the string at `column`.
pub struct FilterPunctuation {
    pub column: String,
}

impl FilterPunctuation {
    pub fn new(column: impl Into<String>) -> Self {
        FilterPunctuation {
            column: column.into(),
        }
    }
}

impl Mapper for FilterPunctuation {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(Value::Str(text)) = row.get(&self.column) {
            let cleaned: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
            row.insert(self.column.clone(), cleaned);
        }
        Ok(vec![row])
    }
}

/// Lowercases the string at `column`.
pub struct LowerCase {
    pub column: String,
}

impl LowerCase {
    pub fn new(column: impl Into<String>) -> Self {
        LowerCase {
            column: column.into(),
        }
    }
}

impl Mapper for LowerCase {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(Value::Str(text)) = row.get(&self.column) {
            row.insert(self.column.clone(), text.to_lowercase());
        }
        Ok(vec![row])
    }
}

/// Emits one row per non-empty whitespace-separated token of `column`,
/// all other columns duplicated across the emitted rows.
pub struct Split {
    pub column: String,
}

impl Split {
    pub fn new(column: impl Into<String>) -> Self {
        Split {
            column: column.into(),
        }
    }
}

impl Mapper for Split {
    fn map(&self, row: Row) -> Result<Vec<Row>, Error> {
        let Some(Value::Str(text)) = row.get(&self.column) else {
            return Ok(vec![row]);
        };
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(vec![]);
        }
        Ok(tokens
            .into_iter()
            .map(|token| row.clone().with(self.column.clone(), token))
            .collect())
    }
}

/// `out = row[num] / row[den]`, when both are present.
pub struct Division {
    pub num: String,
    pub den: String,
    pub out: String,
}

impl Division {
    pub fn new(num: impl Into<String>, den: impl Into<String>, out: impl Into<String>) -> Self {
        Division {
            num: num.into(),
            den: den.into(),
            out: out.into(),
        }
    }
}

impl Mapper for Division {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let (Some(num), Some(den)) = (row.get(&self.num), row.get(&self.den)) {
            if let (Some(num), Some(den)) = (num.as_float(), den.as_float()) {
                row.insert(self.out.clone(), num / den);
            }
        }
        Ok(vec![row])
    }
}

/// `out = ln(row[col])`.
pub struct Logarithm {
    pub column: String,
    pub out: String,
}

impl Logarithm {
    pub fn new(column: impl Into<String>, out: impl Into<String>) -> Self {
        Logarithm {
            column: column.into(),
            out: out.into(),
        }
    }
}

impl Mapper for Logarithm {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(value) = row.get(&self.column).and_then(Value::as_float) {
            row.insert(self.out.clone(), value.ln());
        }
        Ok(vec![row])
    }
}

/// `out = product of row[c] for c in columns`.
pub struct Product {
    pub columns: Vec<String>,
    pub out: String,
}

impl Product {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>, out: impl Into<String>) -> Self {
        Product {
            columns: columns.into_iter().map(Into::into).collect(),
            out: out.into(),
        }
    }
}

impl Mapper for Product {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let mut product = 1.0_f64;
        let mut all_present = true;
        for column in &self.columns {
            match row.get(column).and_then(Value::as_float) {
                Some(v) => product *= v,
                None => {
                    all_present = false;
                    break;
                }
            }
        }
        if all_present {
            row.insert(self.out.clone(), product);
        }
        Ok(vec![row])
    }
}

/// Great-circle distance between two `(lon, lat)` pairs, in kilometres,
/// using Earth radius 6373 km.
pub struct Haversine {
    pub a: String,
    pub b: String,
    pub out: String,
}

const EARTH_RADIUS_KM: f64 = 6373.0;

impl Haversine {
    pub fn new(a: impl Into<String>, b: impl Into<String>, out: impl Into<String>) -> Self {
        Haversine {
            a: a.into(),
            b: b.into(),
            out: out.into(),
        }
    }

    fn distance_km(a_lon: f64, a_lat: f64, b_lon: f64, b_lat: f64) -> f64 {
        let a_lat_rad = a_lat.to_radians();
        let a_lon_rad = a_lon.to_radians();
        let b_lat_rad = b_lat.to_radians();
        let b_lon_rad = b_lon.to_radians();

        let delta_lat = b_lat_rad - a_lat_rad;
        let delta_lon = b_lon_rad - a_lon_rad;
        let numerator = 1.0 - delta_lat.cos()
            + a_lat_rad.cos() * b_lat_rad.cos() * (1.0 - delta_lon.cos());

        2.0 * EARTH_RADIUS_KM * (numerator / 2.0).sqrt().asin()
    }
}

impl Mapper for Haversine {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let (Some(a), Some(b)) = (row.get(&self.a), row.get(&self.b)) {
            if let (Some((a_lon, a_lat)), Some((b_lon, b_lat))) = (a.as_pair(), b.as_pair()) {
                row.insert(self.out.clone(), Self::distance_km(a_lon, a_lat, b_lon, b_lat));
            }
        }
        Ok(vec![row])
    }
}

/// Parses the timestamp at `column`; on success writes the hour to
/// `out`. Parse failure passes the row through unchanged.
pub struct Hour {
    pub column: String,
    pub out: String,
}

impl Hour {
    pub fn new(column: impl Into<String>, out: impl Into<String>) -> Self {
        Hour {
            column: column.into(),
            out: out.into(),
        }
    }
}

impl Mapper for Hour {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(Value::Str(text)) = row.get(&self.column) {
            if let Some(ts) = parse_timestamp(text) {
                row.insert(self.out.clone(), ts.time().hour() as i64);
            }
        }
        Ok(vec![row])
    }
}

/// Parses the timestamp at `column`; on success writes the weekday
/// index (0 = Monday) to `out`. Parse failure passes the row through
/// unchanged.
pub struct Weekday {
    pub column: String,
    pub out: String,
}

impl Weekday {
    pub fn new(column: impl Into<String>, out: impl Into<String>) -> Self {
        Weekday {
            column: column.into(),
            out: out.into(),
        }
    }
}

impl Mapper for Weekday {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(Value::Str(text)) = row.get(&self.column) {
            if let Some(ts) = parse_timestamp(text) {
                row.insert(self.out.clone(), weekday_index(ts.weekday()));
            }
        }
        Ok(vec![row])
    }
}

/// Replaces the integer weekday (0=Monday) at `column` with its
/// three-letter abbreviation (`Mon`..`Sun`).
pub struct ToCalendarWeekday {
    pub column: String,
}

impl ToCalendarWeekday {
    pub fn new(column: impl Into<String>) -> Self {
        ToCalendarWeekday {
            column: column.into(),
        }
    }
}

impl Mapper for ToCalendarWeekday {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(index) = row.get(&self.column).and_then(Value::as_int) {
            let weekday = chrono::Weekday::try_from(index as u8).map_err(|_| {
                Error::Column(format!("weekday index {index} out of range"))
            })?;
            row.insert(self.column.clone(), weekday_abbrev(weekday));
        }
        Ok(vec![row])
    }
}

/// Difference in seconds between two parsed timestamps, written to
/// `out`. Parse failure on either side passes the row through unchanged.
pub struct TimeDifference {
    pub start: String,
    pub end: String,
    pub out: String,
}

impl TimeDifference {
    pub fn new(start: impl Into<String>, end: impl Into<String>, out: impl Into<String>) -> Self {
        TimeDifference {
            start: start.into(),
            end: end.into(),
            out: out.into(),
        }
    }
}

impl Mapper for TimeDifference {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let (Some(Value::Str(start)), Some(Value::Str(end))) =
            (row.get(&self.start), row.get(&self.end))
        {
            if let (Some(start), Some(end)) = (parse_timestamp(start), parse_timestamp(end)) {
                let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
                row.insert(self.out.clone(), seconds);
            }
        }
        Ok(vec![row])
    }
}

/// Multiplies `row[column]` by `coef` in place.
pub struct Normalize {
    pub column: String,
    pub coef: f64,
}

impl Normalize {
    pub fn new(column: impl Into<String>, coef: f64) -> Self {
        Normalize {
            column: column.into(),
            coef,
        }
    }
}

impl Mapper for Normalize {
    fn map(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        if let Some(value) = row.get(&self.column).and_then(Value::as_float) {
            row.insert(self.column.clone(), value * self.coef);
        }
        Ok(vec![row])
    }
}
