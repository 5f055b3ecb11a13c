//! Money representation and rounding.
//!
//! All monetary values inside the engine are i64 integer cents; decimal
//! text exists only at the wire boundary (the persisted workflow record
//! and operator-entered fields). Percentages are integer basis points.
//!
//! # Critical Invariants
//!
//! 1. Money is `i64` cents everywhere; no floating point in arithmetic
//! 2. Rounding is half-up on the scaled integer
//! 3. Normalized amounts are never negative; invalid text is absent

/// Monetary amount in integer cents.
pub type Cents = i64;

/// Apply a basis-point rate to an amount, rounding half-up.
///
/// # Example
/// ```
/// use load_settlement_core_rs::core::money::apply_bps;
///
/// // 7% of 1000.00
/// assert_eq!(apply_bps(100_000, 700), 7_000);
/// // 2.5% of 10.01 = 0.25025 -> 0.25
/// assert_eq!(apply_bps(1_001, 250), 25);
/// ```
pub fn apply_bps(amount: Cents, bps: i64) -> Cents {
    if amount <= 0 || bps <= 0 {
        return 0;
    }
    let scaled = i128::from(amount) * i128::from(bps);
    ((scaled + 5_000) / 10_000) as Cents
}

/// Parse operator-entered decimal text into cents.
///
/// Accepts `.` or `,` as the decimal separator; fraction digits past
/// the second round half-up. Anything negative or malformed is `None`
/// (treated as absent after normalization).
///
/// # Example
/// ```
/// use load_settlement_core_rs::core::money::parse_amount;
///
/// assert_eq!(parse_amount("1000"), Some(100_000));
/// assert_eq!(parse_amount("12,50"), Some(1_250));
/// assert_eq!(parse_amount("0.005"), Some(1));
/// assert_eq!(parse_amount("-3"), None);
/// assert_eq!(parse_amount("abc"), None);
/// ```
pub fn parse_amount(text: &str) -> Option<Cents> {
    parse_scaled_hundredths(text)
}

/// Parse percent text into basis points.
///
/// `"2"` -> 200 bps, `"2.5"` -> 250 bps. Same grammar and rounding as
/// [`parse_amount`]; negative or malformed input is `None`.
pub fn parse_percent_bps(text: &str) -> Option<i64> {
    parse_scaled_hundredths(text)
}

/// Format cents as decimal text with two fraction digits.
///
/// # Example
/// ```
/// use load_settlement_core_rs::core::money::format_amount;
///
/// assert_eq!(format_amount(92_685), "926.85");
/// assert_eq!(format_amount(0), "0.00");
/// ```
pub fn format_amount(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Shared parser: decimal text scaled by 100 (cents, or bps of a
/// percent), rounded half-up at the second fraction digit.
fn parse_scaled_hundredths(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let normalized = text.replace(',', ".");
    let (whole, frac) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut digits = frac.bytes().map(|b| i64::from(b - b'0'));
    let tens = digits.next().unwrap_or(0);
    let units = digits.next().unwrap_or(0);
    let next = digits.next().unwrap_or(0);

    let mut scaled = whole_value.checked_mul(100)?.checked_add(tens * 10 + units)?;
    if next >= 5 {
        scaled = scaled.checked_add(1)?;
    }
    Some(scaled)
}
