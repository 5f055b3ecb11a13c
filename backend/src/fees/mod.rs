//! Fee and payout calculator.
//!
//! Stateless numeric functions over `(base amount, workflow model)`.
//! Everything here is pure and total: under-specified inputs produce
//! `0` or an absent date, never an error.
//!
//! # Critical Invariants
//!
//! 1. All monetary results are i64 cents, rounded half-up on the
//!    scaled integer
//! 2. Subtraction results clamp to 0; a payout is never negative
//! 3. Date projections are absent unless every operand is present and
//!    parses

use chrono::NaiveDate;

// Calendar-day arithmetic is part of the calculator's surface.
pub use crate::core::dates::{add_days, days_until};

use crate::core::dates::parse_day_count;
use crate::core::money::{apply_bps, parse_amount, parse_percent_bps, Cents};
use crate::models::workflow::{CountdownStart, FlowType, ValutaMode, ValutaState, WorkflowModel};

/// Invoitix factoring fee rate: 7% of the base amount.
pub const INVOITIX_FEE_RATE_BPS: i64 = 700;

/// Invoitix fixed fee component: 3.15 in cents.
pub const INVOITIX_FEE_FIXED: Cents = 315;

/// Invoitix pays out within a fixed 48-hour SLA.
pub const INVOITIX_PAYOUT_SLA_DAYS: u32 = 2;

/// Factoring fee for a base amount: `7% + 3.15`, half-up.
///
/// Defined only for positive amounts; `0` otherwise.
///
/// # Example
/// ```
/// use load_settlement_core_rs::fees::invoitix_fee;
///
/// assert_eq!(invoitix_fee(100_000), 7_315); // 73.15 on 1000.00
/// assert_eq!(invoitix_fee(0), 0);
/// ```
pub fn invoitix_fee(base: Cents) -> Cents {
    if base <= 0 {
        return 0;
    }
    apply_bps(base, INVOITIX_FEE_RATE_BPS) + INVOITIX_FEE_FIXED
}

/// Projected invoitix payout: base minus fee, clamped at 0.
///
/// # Example
/// ```
/// use load_settlement_core_rs::fees::invoitix_payout;
///
/// assert_eq!(invoitix_payout(100_000), 92_685); // 926.85 on 1000.00
/// ```
pub fn invoitix_payout(base: Cents) -> Cents {
    (base - invoitix_fee(base)).max(0)
}

/// Skonto early-payment discount on the base amount.
///
/// Only the Skonto mode pays a discount; a missing or non-positive
/// percent yields `0`.
pub fn skonto_fee(base: Cents, mode: ValutaMode, skonto_percent: &str) -> Cents {
    if mode != ValutaMode::Skonto || base <= 0 {
        return 0;
    }
    match parse_percent_bps(skonto_percent) {
        Some(bps) if bps > 0 => apply_bps(base, bps),
        _ => 0,
    }
}

/// Valuta payout: base minus skonto and bank fees, clamped at 0.
///
/// # Example
/// ```
/// use load_settlement_core_rs::fees::valuta_payout;
///
/// assert_eq!(valuta_payout(100_000, 2_000, 500), 97_500);
/// assert_eq!(valuta_payout(10_000, 15_000, 0), 0); // never negative
/// ```
pub fn valuta_payout(base: Cents, skonto_fee: Cents, bank_fee: Cents) -> Cents {
    (base - skonto_fee - bank_fee).max(0)
}

/// Bank fee recorded on the valuta substate, `0` when blank.
pub fn valuta_bank_fee(valuta: &ValutaState) -> Cents {
    parse_amount(&valuta.bank_fee_amount).unwrap_or(0)
}

/// Projected payout for whichever flow is selected; the plain base
/// amount when no flow has been chosen yet.
pub fn projected_payout(model: &WorkflowModel, base: Cents) -> Cents {
    match model.flow_type {
        Some(FlowType::Invoitix) => invoitix_payout(base),
        Some(FlowType::Valuta) => {
            let skonto = skonto_fee(base, model.valuta.mode, &model.valuta.skonto_percent);
            valuta_payout(base, skonto, valuta_bank_fee(&model.valuta))
        }
        None => base,
    }
}

/// Expected invoitix payout date: submission date plus the 48-hour SLA.
pub fn invoitix_projected_payout_date(sent_at: Option<NaiveDate>) -> Option<NaiveDate> {
    sent_at.and_then(|date| add_days(date, INVOITIX_PAYOUT_SLA_DAYS))
}

/// The date the valuta countdown runs from, per the countdown-start
/// rule. Absent until the triggering event has a recorded date.
pub fn valuta_countdown_start_date(valuta: &ValutaState) -> Option<NaiveDate> {
    match valuta.countdown_start? {
        CountdownStart::OriginalsReceived => valuta.documents_arrived_at,
        CountdownStart::EmailCopyInvoice => valuta.invoice_sent_at,
    }
}

/// Projected valuta payout date: countdown start plus the countdown day
/// count. Absent unless both are present and the day count parses.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use load_settlement_core_rs::fees::valuta_projected_payout_date;
/// use load_settlement_core_rs::models::workflow::{CountdownStart, ValutaState};
///
/// let valuta = ValutaState {
///     countdown_start: Some(CountdownStart::EmailCopyInvoice),
///     invoice_sent_at: NaiveDate::from_ymd_opt(2024, 1, 1),
///     countdown_days: "30".to_string(),
///     ..ValutaState::default()
/// };
/// assert_eq!(
///     valuta_projected_payout_date(&valuta),
///     NaiveDate::from_ymd_opt(2024, 1, 31)
/// );
/// ```
pub fn valuta_projected_payout_date(valuta: &ValutaState) -> Option<NaiveDate> {
    let start = valuta_countdown_start_date(valuta)?;
    let days = parse_day_count(&valuta.countdown_days)?;
    add_days(start, days)
}
