//! Computes average travel speed (km/h) by hour and weekday from a log
//! of road-segment crossings and a table of segment lengths.
//!
//! Usage: `yandex_speed <travel_time.jsonl> <edge_length.jsonl> <output.jsonl>`
//!
//! `travel_time.jsonl` rows: `edge_id`, `enter_time`, `leave_time`.
//! `edge_length.jsonl` rows: `edge_id`, `start` and `end` coordinate pairs.

use anyhow::{Context, Result};

use tabflow::graph::Graph;
use tabflow::io::jsonl;
use tabflow::join::InnerJoiner;
use tabflow::mapper::library::{
    Division, Filter, Haversine, Hour, Normalize, Project, Rename, TimeDifference, ToCalendarWeekday, Weekday,
};
use tabflow::reduce::reducers::Sum;

const ENTER_TIME: &str = "enter_time";
const LEAVE_TIME: &str = "leave_time";
const EDGE_ID: &str = "edge_id";
const START_COORD: &str = "start";
const END_COORD: &str = "end";
const WEEKDAY_COLUMN: &str = "weekday";
const HOUR_COLUMN: &str = "hour";
const SPEED_COLUMN: &str = "speed";

fn main() -> Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let usage = "usage: yandex_speed <travel_time.jsonl> <edge_length.jsonl> <output.jsonl>";
    let travel_time_input = args.next().context(usage)?;
    let edge_length_input = args.next().context(usage)?;
    let output = args.next().context(usage)?;

    let edge_with_dist = Graph::from_file(&edge_length_input, jsonl::parser())
        .map(Haversine::new(START_COORD, END_COORD, "edge_length"))
        .map(Project::new([EDGE_ID, "edge_length"]))
        .sort([EDGE_ID]);

    let logs_with_time = Graph::from_file(&travel_time_input, jsonl::parser())
        .map(Hour::new(ENTER_TIME, HOUR_COLUMN))
        .map(Weekday::new(ENTER_TIME, WEEKDAY_COLUMN))
        .map(Filter::new(|row: &tabflow::row::Row| {
            row.get(HOUR_COLUMN).is_some() && row.get(WEEKDAY_COLUMN).is_some()
        }))
        .map(TimeDifference::new(ENTER_TIME, LEAVE_TIME, "travel_time"))
        .map(Filter::new(|row: &tabflow::row::Row| {
            row.get("travel_time").and_then(|v| v.as_float()).is_some_and(|t| t >= 0.0)
        }));

    let logs_with_total_time = logs_with_time
        .sort([HOUR_COLUMN, WEEKDAY_COLUMN])
        .reduce(Sum::new("travel_time"), [HOUR_COLUMN, WEEKDAY_COLUMN])
        .map(Rename::new("travel_time", "total_time"))
        .map(Project::new([HOUR_COLUMN, WEEKDAY_COLUMN, "total_time"]));

    let logs_with_total_dist = logs_with_time
        .sort([EDGE_ID])
        .join(InnerJoiner::new(), edge_with_dist, [EDGE_ID])
        .sort([HOUR_COLUMN, WEEKDAY_COLUMN])
        .reduce(Sum::new("edge_length"), [HOUR_COLUMN, WEEKDAY_COLUMN])
        .map(Rename::new("edge_length", "total_dist"))
        .map(Project::new([HOUR_COLUMN, WEEKDAY_COLUMN, "total_dist"]));

    let average_speed = logs_with_total_time
        .join(InnerJoiner::new(), logs_with_total_dist, [HOUR_COLUMN, WEEKDAY_COLUMN])
        .map(Division::new("total_dist", "total_time", SPEED_COLUMN))
        .map(ToCalendarWeekday::new(WEEKDAY_COLUMN))
        .map(Project::new([HOUR_COLUMN, WEEKDAY_COLUMN, SPEED_COLUMN]))
        // total_dist/total_time is km/s since Haversine yields
        // kilometres; 3600 converts that to km/h.
        .map(Normalize::new(SPEED_COLUMN, 3600.0))
        .sort([HOUR_COLUMN, WEEKDAY_COLUMN]);

    let rows = average_speed.run(Default::default());
    let written = jsonl::write_file(&output, rows).with_context(|| format!("writing {output}"))?;
    log::info!("wrote {written} row(s) to {output}");
    Ok(())
}
