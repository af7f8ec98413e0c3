//! Unit-level checks of the built-in mapper library, run directly
//! against rows rather than through a graph.

use tabflow::mapper::Mapper;
use tabflow::mapper::library::{
    Division, FilterPunctuation, Haversine, Hour, Logarithm, LowerCase, Normalize, Product, Project,
    Rename, Split, TimeDifference, ToCalendarWeekday, Weekday,
};
use tabflow::testing::builders::RowBuilder;

#[test]
fn filter_punctuation_strips_ascii_punctuation_only() {
    let row = RowBuilder::new().col("text", "Hello, world! It's 2026.").build();
    let out = FilterPunctuation::new("text").map(row).unwrap();
    assert_eq!(out[0].get("text").unwrap().as_str(), Some("Hello world Its 2026"));
}

#[test]
fn lower_case_leaves_non_string_columns_untouched() {
    let row = RowBuilder::new().col("text", "MIXED Case").col("n", 5).build();
    let out = LowerCase::new("text").map(row).unwrap();
    assert_eq!(out[0].get("text").unwrap().as_str(), Some("mixed case"));
    assert_eq!(out[0].get("n").unwrap().as_int(), Some(5));
}

#[test]
fn split_emits_one_row_per_token_with_other_columns_duplicated() {
    let row = RowBuilder::new().col("text", "a  b   c").col("doc_id", 1).build();
    let out = Split::new("text").map(row).unwrap();
    assert_eq!(out.len(), 3);
    for (expected, row) in ["a", "b", "c"].iter().zip(&out) {
        assert_eq!(row.get("text").unwrap().as_str(), Some(*expected));
        assert_eq!(row.get("doc_id").unwrap().as_int(), Some(1));
    }
}

#[test]
fn split_on_empty_text_emits_no_rows() {
    let row = RowBuilder::new().col("text", "   ").build();
    let out = Split::new("text").map(row).unwrap();
    assert!(out.is_empty());
}

#[test]
fn split_passes_non_string_column_through_unchanged() {
    let row = RowBuilder::new().col("n", 1).build();
    let out = Split::new("text").map(row.clone()).unwrap();
    assert_eq!(out, vec![row]);
}

#[test]
fn project_drops_absent_columns_silently() {
    let row = RowBuilder::new().col("a", 1).col("b", 2).build();
    let out = Project::new(["a", "c"]).map(row).unwrap();
    assert!(out[0].contains("a"));
    assert!(!out[0].contains("b"));
    assert!(!out[0].contains("c"));
}

#[test]
fn rename_moves_the_value_and_drops_the_old_name() {
    let row = RowBuilder::new().col("old", 7).build();
    let out = Rename::new("old", "new").map(row).unwrap();
    assert!(!out[0].contains("old"));
    assert_eq!(out[0].get("new").unwrap().as_int(), Some(7));
}

#[test]
fn rename_is_a_no_op_when_the_source_column_is_absent() {
    let row = RowBuilder::new().col("other", 1).build();
    let out = Rename::new("old", "new").map(row.clone()).unwrap();
    assert_eq!(out, vec![row]);
}

#[test]
fn division_computes_the_quotient_when_both_sides_present() {
    let row = RowBuilder::new().col("num", 9.0).col("den", 3.0).build();
    let out = Division::new("num", "den", "q").map(row).unwrap();
    assert_eq!(out[0].get("q").unwrap().as_float(), Some(3.0));
}

#[test]
fn division_skips_writing_the_output_when_a_side_is_missing() {
    let row = RowBuilder::new().col("num", 9.0).build();
    let out = Division::new("num", "den", "q").map(row).unwrap();
    assert!(!out[0].contains("q"));
}

#[test]
fn logarithm_is_the_natural_log() {
    let row = RowBuilder::new().col("x", std::f64::consts::E).build();
    let out = Logarithm::new("x", "ln_x").map(row).unwrap();
    assert!((out[0].get("ln_x").unwrap().as_float().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn product_requires_every_column_present() {
    let row = RowBuilder::new().col("a", 2.0).col("b", 3.0).col("c", 4.0).build();
    let out = Product::new(["a", "b", "c"], "total").map(row).unwrap();
    assert_eq!(out[0].get("total").unwrap().as_float(), Some(24.0));

    let missing_one = RowBuilder::new().col("a", 2.0).col("b", 3.0).build();
    let out = Product::new(["a", "b", "c"], "total").map(missing_one).unwrap();
    assert!(!out[0].contains("total"));
}

#[test]
fn haversine_distance_between_identical_points_is_zero() {
    let row = RowBuilder::new()
        .col("start", (37.84870, 55.73608))
        .col("end", (37.84870, 55.73608))
        .build();
    let out = Haversine::new("start", "end", "dist").map(row).unwrap();
    assert!(out[0].get("dist").unwrap().as_float().unwrap().abs() < 1e-9);
}

#[test]
fn haversine_distance_is_positive_for_distinct_points() {
    // Moscow-ish coordinates roughly 500m apart.
    let row = RowBuilder::new()
        .col("start", (37.84870, 55.73608))
        .col("end", (37.53758, 55.84149))
        .build();
    let out = Haversine::new("start", "end", "dist").map(row).unwrap();
    let dist = out[0].get("dist").unwrap().as_float().unwrap();
    assert!(dist > 0.0);
    // Kilometres, not metres: these points are roughly 20km apart, not 20000.
    assert!(dist < 100.0);
}

#[test]
fn hour_and_weekday_parse_the_timestamp_format_used_throughout() {
    let row = RowBuilder::new().col("ts", "20171020T112238.723000").build();
    let row = Hour::new("ts", "hour").map(row).unwrap().remove(0);
    let row = Weekday::new("ts", "weekday").map(row).unwrap().remove(0);
    assert_eq!(row.get("hour").unwrap().as_int(), Some(11));
    // 2017-10-20 was a Friday: index 4 (0 = Monday).
    assert_eq!(row.get("weekday").unwrap().as_int(), Some(4));
}

#[test]
fn hour_and_weekday_pass_unparseable_timestamps_through_unchanged() {
    let row = RowBuilder::new().col("ts", "not-a-timestamp").build();
    let out = Hour::new("ts", "hour").map(row.clone()).unwrap();
    assert_eq!(out, vec![row]);
}

#[test]
fn to_calendar_weekday_replaces_the_index_with_an_abbreviation() {
    let row = RowBuilder::new().col("weekday", 4).build();
    let out = ToCalendarWeekday::new("weekday").map(row).unwrap();
    assert_eq!(out[0].get("weekday").unwrap().as_str(), Some("Fri"));
}

#[test]
fn time_difference_is_measured_in_seconds() {
    let row = RowBuilder::new()
        .col("enter", "20171020T112238.000000")
        .col("leave", "20171020T112240.500000")
        .build();
    let out = TimeDifference::new("enter", "leave", "dt").map(row).unwrap();
    assert_eq!(out[0].get("dt").unwrap().as_float(), Some(2.5));
}

#[test]
fn normalize_multiplies_in_place() {
    let row = RowBuilder::new().col("speed", 2.0).build();
    let out = Normalize::new("speed", 3600.0).map(row).unwrap();
    assert_eq!(out[0].get("speed").unwrap().as_float(), Some(7200.0));
}
