//! Timestamp parsing shared by the `Hour`/`Weekday`/`TimeDifference` mappers.
//!
//! Accepts `YYYYMMDDThhmmss` with an optional fractional-seconds suffix.
//! Parsing is deliberately forgiving: callers treat failure as "pass the
//! row through unchanged", not as a propagated error.

use chrono::NaiveDateTime;

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S"))
        .ok()
}

/// Three-letter weekday abbreviation for a `chrono::Weekday`, starting
/// `Mon` (weekday 0) as the original's `calendar.day_abbr` table does.
pub fn weekday_abbrev(weekday: chrono::Weekday) -> &'static str {
    use chrono::Weekday::*;
    match weekday {
        Mon => "Mon",
        Tue => "Tue",
        Wed => "Wed",
        Thu => "Thu",
        Fri => "Fri",
        Sat => "Sat",
        Sun => "Sun",
    }
}

/// Weekday as `0 (Mon) .. 6 (Sun)`, matching Python's `datetime.weekday()`.
pub fn weekday_index(weekday: chrono::Weekday) -> i64 {
    weekday.num_days_from_monday() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_with_fractional_seconds() {
        let ts = parse_timestamp("20171020T112237.427000").unwrap();
        assert_eq!(ts.time().hour(), 11);
    }

    #[test]
    fn parses_without_fractional_seconds() {
        let ts = parse_timestamp("20171020T112237").unwrap();
        assert_eq!(ts.time().hour(), 11);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("badvalue").is_none());
    }
}
