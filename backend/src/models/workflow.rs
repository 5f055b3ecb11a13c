//! Settlement workflow model.
//!
//! `WorkflowModel` is the in-memory representation of a payment's
//! settlement workflow. One model is owned by exactly one payment
//! record; it is created with defaults the first time a load's payment
//! is opened and mutated only through the step commands in
//! [`crate::engine`].
//!
//! # Critical Invariants
//!
//! 1. Exactly one of the `invoitix`/`valuta` branches is active at a
//!    time, selected by `flow_type`; the inactive branch is retained
//!    but inert
//! 2. All dates are calendar dates (`YYYY-MM-DD` keys on the wire)
//! 3. Numeric text fields are normalized to non-negative or blank
//! 4. `merge_defaults` is total: any partial input yields a full model

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::core::dates::{format_date_key, parse_date_key, parse_day_count};
use crate::core::money::{parse_amount, parse_percent_bps};

/// Settlement path for a load's payment.
///
/// The two paths are mutually exclusive; `None` on the model means the
/// operator has not yet decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Factoring-style settlement: a third party pays out quickly for a fee.
    Invoitix,
    /// Direct settlement after a countdown from a triggering event.
    Valuta,
}

impl FlowType {
    /// Wire key as stored on the persisted record.
    pub fn key(&self) -> &'static str {
        match self {
            FlowType::Invoitix => "INVOITIX",
            FlowType::Valuta => "VALUTA",
        }
    }

    /// Parse a wire key; unknown text is `None`.
    pub fn from_key(text: &str) -> Option<Self> {
        match text.trim() {
            "INVOITIX" => Some(FlowType::Invoitix),
            "VALUTA" => Some(FlowType::Valuta),
            _ => None,
        }
    }
}

/// Invoitix submission decision. Informational metadata; does not gate
/// the step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvoitixDecision {
    #[default]
    Pending,
    Rejected,
    Approved,
}

impl InvoitixDecision {
    pub fn key(&self) -> &'static str {
        match self {
            InvoitixDecision::Pending => "PENDING",
            InvoitixDecision::Rejected => "REJECTED",
            InvoitixDecision::Approved => "APPROVED",
        }
    }

    pub fn from_key(text: &str) -> Option<Self> {
        match text.trim() {
            "PENDING" => Some(InvoitixDecision::Pending),
            "REJECTED" => Some(InvoitixDecision::Rejected),
            "APPROVED" => Some(InvoitixDecision::Approved),
            _ => None,
        }
    }
}

/// Valuta settlement mode: plain countdown, or countdown with a Skonto
/// early-payment discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValutaMode {
    #[default]
    Valuta,
    Skonto,
}

impl ValutaMode {
    pub fn key(&self) -> &'static str {
        match self {
            ValutaMode::Valuta => "VALUTA",
            ValutaMode::Skonto => "SKONTO",
        }
    }

    pub fn from_key(text: &str) -> Option<Self> {
        match text.trim() {
            "VALUTA" => Some(ValutaMode::Valuta),
            "SKONTO" => Some(ValutaMode::Skonto),
            _ => None,
        }
    }
}

/// Which event's date starts the countdown toward expected payout.
///
/// This selection fixes the valuta step sequence, so it is covered by
/// the flow-edit lock once any step has recorded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStart {
    /// Countdown runs from the day the original documents arrived.
    OriginalsReceived,
    /// Countdown runs from the day the invoice copy was emailed.
    EmailCopyInvoice,
}

impl CountdownStart {
    pub fn key(&self) -> &'static str {
        match self {
            CountdownStart::OriginalsReceived => "ORIGINALS_RECEIVED",
            CountdownStart::EmailCopyInvoice => "EMAIL_COPY_INVOICE",
        }
    }

    pub fn from_key(text: &str) -> Option<Self> {
        match text.trim() {
            "ORIGINALS_RECEIVED" => Some(CountdownStart::OriginalsReceived),
            "EMAIL_COPY_INVOICE" => Some(CountdownStart::EmailCopyInvoice),
            _ => None,
        }
    }
}

/// How the invoice is dispatched to the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceDispatch {
    EmailWithCmr,
    WaitAndShipOriginals,
}

impl InvoiceDispatch {
    pub fn key(&self) -> &'static str {
        match self {
            InvoiceDispatch::EmailWithCmr => "EMAIL_WITH_CMR",
            InvoiceDispatch::WaitAndShipOriginals => "WAIT_AND_SHIP_ORIGINALS",
        }
    }

    pub fn from_key(text: &str) -> Option<Self> {
        match text.trim() {
            "EMAIL_WITH_CMR" => Some(InvoiceDispatch::EmailWithCmr),
            "WAIT_AND_SHIP_ORIGINALS" => Some(InvoiceDispatch::WaitAndShipOriginals),
            _ => None,
        }
    }
}

/// Invoitix branch substate. Meaningful only while `flow_type` is
/// [`FlowType::Invoitix`]; retained but inert otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvoitixState {
    pub sent_at: Option<NaiveDate>,
    pub decision: InvoitixDecision,
    pub rejected_at: Option<NaiveDate>,
    pub resubmitted_at: Option<NaiveDate>,
    pub approved_at: Option<NaiveDate>,
    pub paid_out_at: Option<NaiveDate>,
    pub payout_reference: String,
    pub projected_income_added_at: Option<NaiveDate>,
    pub payout_confirmed_at: Option<NaiveDate>,
}

/// Valuta branch substate. Meaningful only while `flow_type` is
/// [`FlowType::Valuta`]; retained but inert otherwise.
///
/// `countdown_days`, `skonto_percent` and `bank_fee_amount` hold the
/// operator's raw text, normalized so that anything that does not parse
/// to a non-negative number is blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValutaState {
    pub mode: ValutaMode,
    pub countdown_start: Option<CountdownStart>,
    pub countdown_days: String,
    pub skonto_percent: String,
    pub sent_to_accountant_at: Option<NaiveDate>,
    pub invoice_dispatch: Option<InvoiceDispatch>,
    pub invoice_sent_at: Option<NaiveDate>,
    pub shipped_at: Option<NaiveDate>,
    pub tracking_number: String,
    pub documents_arrived_at: Option<NaiveDate>,
    pub payout_received_at: Option<NaiveDate>,
    pub bank_fee_amount: String,
}

/// In-memory settlement workflow of one payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowModel {
    pub flow_type: Option<FlowType>,
    pub invoitix: InvoitixState,
    pub valuta: ValutaState,
}

impl WorkflowModel {
    /// Deep-merge a possibly-partial patch over a full default model.
    ///
    /// Total: absent fields keep their defaults, invalid values fall
    /// back to defaults, unknown keys were already dropped when the
    /// patch was deserialized. Idempotent over
    /// [`WorkflowModel::to_patch`].
    ///
    /// # Example
    /// ```
    /// use load_settlement_core_rs::models::workflow::{FlowType, WorkflowModel, WorkflowPatch};
    ///
    /// let patch: WorkflowPatch =
    ///     serde_json::from_str(r#"{"flowType":"VALUTA"}"#).unwrap();
    /// let model = WorkflowModel::merge_defaults(&patch);
    /// assert_eq!(model.flow_type, Some(FlowType::Valuta));
    /// assert_eq!(model.valuta.countdown_days, "");
    /// ```
    pub fn merge_defaults(patch: &WorkflowPatch) -> WorkflowModel {
        let mut model = WorkflowModel::default();
        if let Some(text) = &patch.flow_type {
            model.flow_type = FlowType::from_key(&text.0);
        }
        if let Some(invoitix) = &patch.invoitix {
            merge_invoitix(&mut model.invoitix, invoitix);
        }
        if let Some(valuta) = &patch.valuta {
            merge_valuta(&mut model.valuta, valuta);
        }
        model
    }

    /// Render the model as a full patch (every field present).
    pub fn to_patch(&self) -> WorkflowPatch {
        WorkflowPatch {
            flow_type: Some(Text(
                self.flow_type.map(|f| f.key().to_string()).unwrap_or_default(),
            )),
            invoitix: Some(InvoitixPatch {
                sent_at: date_text(self.invoitix.sent_at),
                decision: Some(Text(self.invoitix.decision.key().to_string())),
                rejected_at: date_text(self.invoitix.rejected_at),
                resubmitted_at: date_text(self.invoitix.resubmitted_at),
                approved_at: date_text(self.invoitix.approved_at),
                paid_out_at: date_text(self.invoitix.paid_out_at),
                payout_reference: Some(Text(self.invoitix.payout_reference.clone())),
                projected_income_added_at: date_text(self.invoitix.projected_income_added_at),
                payout_confirmed_at: date_text(self.invoitix.payout_confirmed_at),
            }),
            valuta: Some(ValutaPatch {
                mode: Some(Text(self.valuta.mode.key().to_string())),
                countdown_start: Some(Text(
                    self.valuta
                        .countdown_start
                        .map(|c| c.key().to_string())
                        .unwrap_or_default(),
                )),
                countdown_days: Some(Text(self.valuta.countdown_days.clone())),
                skonto_percent: Some(Text(self.valuta.skonto_percent.clone())),
                sent_to_accountant_at: date_text(self.valuta.sent_to_accountant_at),
                invoice_dispatch: Some(Text(
                    self.valuta
                        .invoice_dispatch
                        .map(|d| d.key().to_string())
                        .unwrap_or_default(),
                )),
                invoice_sent_at: date_text(self.valuta.invoice_sent_at),
                shipped_at: date_text(self.valuta.shipped_at),
                tracking_number: Some(Text(self.valuta.tracking_number.clone())),
                documents_arrived_at: date_text(self.valuta.documents_arrived_at),
                payout_received_at: date_text(self.valuta.payout_received_at),
                bank_fee_amount: Some(Text(self.valuta.bank_fee_amount.clone())),
            }),
        }
    }

    /// True once any invoitix step has recorded data. Used by the
    /// flow-edit lock.
    pub fn has_invoitix_started(&self) -> bool {
        let inv = &self.invoitix;
        inv.sent_at.is_some()
            || inv.rejected_at.is_some()
            || inv.resubmitted_at.is_some()
            || inv.approved_at.is_some()
            || inv.paid_out_at.is_some()
            || inv.payout_confirmed_at.is_some()
            || inv.projected_income_added_at.is_some()
    }

    /// True once any valuta step has recorded data. Used by the
    /// flow-edit lock.
    pub fn has_valuta_started(&self) -> bool {
        let val = &self.valuta;
        val.invoice_sent_at.is_some()
            || val.shipped_at.is_some()
            || !val.tracking_number.trim().is_empty()
            || val.documents_arrived_at.is_some()
            || val.payout_received_at.is_some()
            || !val.bank_fee_amount.trim().is_empty()
    }
}

/// Lenient text scalar: deserializes from any JSON scalar, carrying it
/// as text. Legacy payloads were written by a dynamically-typed client,
/// so a day count may arrive as `30` or `"30"`; both must merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(pub String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            // null, arrays, objects carry no scalar
            _ => String::new(),
        };
        Ok(Text(text))
    }
}

/// Partial invoitix substate as found in patches and legacy payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoitixPatch {
    pub sent_at: Option<Text>,
    pub decision: Option<Text>,
    pub rejected_at: Option<Text>,
    pub resubmitted_at: Option<Text>,
    pub approved_at: Option<Text>,
    pub paid_out_at: Option<Text>,
    pub payout_reference: Option<Text>,
    pub projected_income_added_at: Option<Text>,
    pub payout_confirmed_at: Option<Text>,
}

/// Partial valuta substate as found in patches and legacy payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValutaPatch {
    pub mode: Option<Text>,
    pub countdown_start: Option<Text>,
    pub countdown_days: Option<Text>,
    pub skonto_percent: Option<Text>,
    pub sent_to_accountant_at: Option<Text>,
    pub invoice_dispatch: Option<Text>,
    pub invoice_sent_at: Option<Text>,
    pub shipped_at: Option<Text>,
    pub tracking_number: Option<Text>,
    pub documents_arrived_at: Option<Text>,
    pub payout_received_at: Option<Text>,
    pub bank_fee_amount: Option<Text>,
}

/// Partial workflow as found in patches and legacy payloads. The schema
/// is closed: unknown keys are dropped at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowPatch {
    pub flow_type: Option<Text>,
    pub invoitix: Option<InvoitixPatch>,
    pub valuta: Option<ValutaPatch>,
}

fn merge_invoitix(state: &mut InvoitixState, patch: &InvoitixPatch) {
    merge_date(&mut state.sent_at, &patch.sent_at);
    if let Some(text) = &patch.decision {
        state.decision = InvoitixDecision::from_key(&text.0).unwrap_or_default();
    }
    merge_date(&mut state.rejected_at, &patch.rejected_at);
    merge_date(&mut state.resubmitted_at, &patch.resubmitted_at);
    merge_date(&mut state.approved_at, &patch.approved_at);
    merge_date(&mut state.paid_out_at, &patch.paid_out_at);
    merge_text(&mut state.payout_reference, &patch.payout_reference);
    merge_date(
        &mut state.projected_income_added_at,
        &patch.projected_income_added_at,
    );
    merge_date(&mut state.payout_confirmed_at, &patch.payout_confirmed_at);
}

fn merge_valuta(state: &mut ValutaState, patch: &ValutaPatch) {
    if let Some(text) = &patch.mode {
        state.mode = ValutaMode::from_key(&text.0).unwrap_or_default();
    }
    if let Some(text) = &patch.countdown_start {
        state.countdown_start = CountdownStart::from_key(&text.0);
    }
    if let Some(text) = &patch.countdown_days {
        state.countdown_days = normalize_numeric(&text.0, |t| parse_day_count(t).is_some());
    }
    if let Some(text) = &patch.skonto_percent {
        state.skonto_percent = normalize_numeric(&text.0, |t| parse_percent_bps(t).is_some());
    }
    merge_date(&mut state.sent_to_accountant_at, &patch.sent_to_accountant_at);
    if let Some(text) = &patch.invoice_dispatch {
        state.invoice_dispatch = InvoiceDispatch::from_key(&text.0);
    }
    merge_date(&mut state.invoice_sent_at, &patch.invoice_sent_at);
    merge_date(&mut state.shipped_at, &patch.shipped_at);
    merge_text(&mut state.tracking_number, &patch.tracking_number);
    merge_date(&mut state.documents_arrived_at, &patch.documents_arrived_at);
    merge_date(&mut state.payout_received_at, &patch.payout_received_at);
    if let Some(text) = &patch.bank_fee_amount {
        state.bank_fee_amount = normalize_numeric(&text.0, |t| parse_amount(t).is_some());
    }
}

fn merge_date(slot: &mut Option<NaiveDate>, field: &Option<Text>) {
    if let Some(text) = field {
        *slot = parse_date_key(&text.0);
    }
}

fn merge_text(slot: &mut String, field: &Option<Text>) {
    if let Some(text) = field {
        *slot = text.0.trim().to_string();
    }
}

/// Keep the operator's text if it parses non-negative; blank otherwise.
fn normalize_numeric(text: &str, parses: impl Fn(&str) -> bool) -> String {
    let trimmed = text.trim();
    if parses(trimmed) {
        trimmed.to_string()
    } else {
        String::new()
    }
}

fn date_text(date: Option<NaiveDate>) -> Option<Text> {
    Some(Text(date.map(format_date_key).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_has_no_flow() {
        let model = WorkflowModel::default();
        assert_eq!(model.flow_type, None);
        assert_eq!(model.invoitix.decision, InvoitixDecision::Pending);
        assert_eq!(model.valuta.mode, ValutaMode::Valuta);
        assert!(!model.has_invoitix_started());
        assert!(!model.has_valuta_started());
    }

    #[test]
    fn test_merge_invalid_values_fall_back_to_defaults() {
        let patch: WorkflowPatch = serde_json::from_str(
            r#"{
                "flowType": "PAYPAL",
                "valuta": {
                    "mode": "nope",
                    "countdownDays": "-3",
                    "skontoPercent": "two",
                    "invoiceSentAt": "01.02.2024"
                }
            }"#,
        )
        .unwrap();
        let model = WorkflowModel::merge_defaults(&patch);
        assert_eq!(model.flow_type, None);
        assert_eq!(model.valuta.mode, ValutaMode::Valuta);
        assert_eq!(model.valuta.countdown_days, "");
        assert_eq!(model.valuta.skonto_percent, "");
        assert_eq!(model.valuta.invoice_sent_at, None);
    }

    #[test]
    fn test_merge_accepts_numeric_scalars_as_text() {
        let patch: WorkflowPatch =
            serde_json::from_str(r#"{"valuta": {"countdownDays": 30, "skontoPercent": 2.5}}"#)
                .unwrap();
        let model = WorkflowModel::merge_defaults(&patch);
        assert_eq!(model.valuta.countdown_days, "30");
        assert_eq!(model.valuta.skonto_percent, "2.5");
    }

    #[test]
    fn test_merge_drops_unknown_keys() {
        let patch: WorkflowPatch = serde_json::from_str(
            r#"{"flowType": "INVOITIX", "somethingElse": {"nested": true}}"#,
        )
        .unwrap();
        let model = WorkflowModel::merge_defaults(&patch);
        assert_eq!(model.flow_type, Some(FlowType::Invoitix));
    }

    #[test]
    fn test_started_predicates_see_blank_text_as_not_started() {
        let mut model = WorkflowModel::default();
        model.valuta.tracking_number = "   ".to_string();
        assert!(!model.has_valuta_started());
        model.valuta.tracking_number = "RR123456785DE".to_string();
        assert!(model.has_valuta_started());
    }

    #[test]
    fn test_merge_is_idempotent_over_to_patch() {
        let patch: WorkflowPatch = serde_json::from_str(
            r#"{
                "flowType": "VALUTA",
                "valuta": {"countdownStart": "EMAIL_COPY_INVOICE", "countdownDays": "30"}
            }"#,
        )
        .unwrap();
        let once = WorkflowModel::merge_defaults(&patch);
        let twice = WorkflowModel::merge_defaults(&once.to_patch());
        assert_eq!(once, twice);
    }
}
