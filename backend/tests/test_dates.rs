//! Calendar-date arithmetic tests.

use chrono::NaiveDate;
use load_settlement_core_rs::core::dates::{
    add_days, days_until, format_date_key, parse_date_key, parse_day_count,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_parse_and_format_round_trip() {
    let key = "2024-02-29";
    let parsed = parse_date_key(key).unwrap();
    assert_eq!(format_date_key(parsed), key);
}

#[test]
fn test_date_ordering_matches_lexicographic_keys() {
    // NaiveDate ordering must agree with string ordering of the keys.
    let keys = ["2023-12-31", "2024-01-01", "2024-01-02", "2024-02-01"];
    for pair in keys.windows(2) {
        let a = parse_date_key(pair[0]).unwrap();
        let b = parse_date_key(pair[1]).unwrap();
        assert!(a < b, "{} should sort before {}", pair[0], pair[1]);
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_add_days_over_leap_day() {
    assert_eq!(add_days(date(2024, 2, 28), 2), Some(date(2024, 3, 1)));
    assert_eq!(add_days(date(2023, 2, 28), 2), Some(date(2023, 3, 2)));
}

#[test]
fn test_days_until_signs() {
    let today = date(2024, 6, 10);
    assert_eq!(days_until(today, Some(date(2024, 6, 17))), Some(7));
    assert_eq!(days_until(today, Some(today)), Some(0));
    // Overdue targets go negative, they are not clamped.
    assert_eq!(days_until(today, Some(date(2024, 6, 3))), Some(-7));
    assert_eq!(days_until(today, None), None);
}

#[test]
fn test_day_count_parsing_is_strict() {
    assert_eq!(parse_day_count("45"), Some(45));
    assert_eq!(parse_day_count("007"), Some(7));
    assert_eq!(parse_day_count("4.5"), None);
    assert_eq!(parse_day_count("+3"), None);
}
