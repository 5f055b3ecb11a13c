//! Calendar-date keys and day arithmetic.
//!
//! The workflow engine operates on calendar dates only (no time-of-day,
//! no timezone). Dates cross the wire as `YYYY-MM-DD` text keys; inside
//! the engine they are `chrono::NaiveDate`, whose ordering matches the
//! lexicographic ordering of the keys.

use chrono::{Days, NaiveDate};

/// Wire format for date keys.
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date key.
///
/// Returns `None` for blank or malformed input. Decoding must never
/// fail outward, so callers treat `None` as "absent".
///
/// # Example
/// ```
/// use load_settlement_core_rs::core::dates::parse_date_key;
///
/// assert!(parse_date_key("2024-01-31").is_some());
/// assert!(parse_date_key("31.01.2024").is_none());
/// assert!(parse_date_key("").is_none());
/// ```
pub fn parse_date_key(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_KEY_FORMAT).ok()
}

/// Format a date as a `YYYY-MM-DD` key.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use load_settlement_core_rs::core::dates::format_date_key;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(format_date_key(date), "2024-01-31");
/// ```
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Add `days` calendar days to a date.
///
/// Returns `None` only when the result would leave chrono's
/// representable range.
pub fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

/// Number of calendar days from `today` until `target`.
///
/// Negative when the target date is already in the past (overdue),
/// `None` when the target is absent.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use load_settlement_core_rs::core::dates::days_until;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let due = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// assert_eq!(days_until(today, Some(due)), Some(-2));
/// assert_eq!(days_until(today, None), None);
/// ```
pub fn days_until(today: NaiveDate, target: Option<NaiveDate>) -> Option<i64> {
    target.map(|date| (date - today).num_days())
}

/// Parse a day-count text field to a non-negative integer.
///
/// Countdown day counts arrive as operator-entered text. Anything that
/// does not parse to an integer >= 0 is treated as absent.
pub fn parse_day_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
