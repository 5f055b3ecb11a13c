//! Workflow codec.
//!
//! Serializes [`WorkflowModel`](crate::models::WorkflowModel) to the
//! flat field set the payment record store persists, and decodes it
//! back. Decoding is total: absent or malformed fields degrade to
//! defaults, never to an error. The legacy free-text notes path lives
//! in [`notes`].
//!
//! # Critical Invariants
//!
//! 1. `decode(encode(model, note)) == (model, note)` for normalized
//!    models
//! 2. Decoding never fails; bad data becomes `None`/blank
//! 3. The derived valuta payout projection is stored on encode, so
//!    readers that never load the engine still see it

pub mod notes;

pub use notes::{decode_legacy_notes, DecodedNotes, NotesPayload, WORKFLOW_NOTES_KIND};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::dates::{format_date_key, parse_date_key, parse_day_count};
use crate::core::money::{parse_amount, parse_percent_bps};
use crate::fees::valuta_projected_payout_date;
use crate::models::workflow::{
    CountdownStart, FlowType, InvoiceDispatch, InvoitixDecision, ValutaMode,
};
use crate::models::{LoadFacts, WorkflowModel};

/// Persisted workflow sub-record: the flat camelCase field set stored
/// on the external payment record. Every field is optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub flow_type: Option<String>,
    pub invoitix_sent_at: Option<String>,
    pub invoitix_decision: Option<String>,
    pub invoitix_rejected_at: Option<String>,
    pub invoitix_resubmitted_at: Option<String>,
    pub invoitix_approved_at: Option<String>,
    pub invoitix_paid_out_at: Option<String>,
    pub invoitix_payout_reference: Option<String>,
    pub invoitix_projected_income_added_at: Option<String>,
    pub invoitix_payout_confirmed_at: Option<String>,
    pub valuta_mode: Option<String>,
    pub valuta_countdown_start: Option<String>,
    pub valuta_countdown_days: Option<String>,
    pub valuta_skonto_percent: Option<String>,
    pub valuta_sent_to_accountant_at: Option<String>,
    pub valuta_invoice_dispatch: Option<String>,
    pub valuta_invoice_sent_at: Option<String>,
    pub valuta_shipped_at: Option<String>,
    pub valuta_tracking_number: Option<String>,
    pub valuta_documents_arrived_at: Option<String>,
    pub valuta_payout_received_at: Option<String>,
    pub valuta_bank_fee_amount: Option<String>,
    /// Derived from the countdown rule on encode so it is stored, not
    /// just computed on read.
    pub valuta_projected_payout_date: Option<String>,
    pub manual_note: Option<String>,
}

/// Flatten a model (plus the operator's manual note) into the persisted
/// record shape.
pub fn encode(model: &WorkflowModel, manual_note: &str) -> WorkflowRecord {
    let inv = &model.invoitix;
    let val = &model.valuta;
    WorkflowRecord {
        flow_type: model.flow_type.map(|f| f.key().to_string()),
        invoitix_sent_at: encode_date(inv.sent_at),
        invoitix_decision: Some(inv.decision.key().to_string()),
        invoitix_rejected_at: encode_date(inv.rejected_at),
        invoitix_resubmitted_at: encode_date(inv.resubmitted_at),
        invoitix_approved_at: encode_date(inv.approved_at),
        invoitix_paid_out_at: encode_date(inv.paid_out_at),
        invoitix_payout_reference: encode_text(&inv.payout_reference),
        invoitix_projected_income_added_at: encode_date(inv.projected_income_added_at),
        invoitix_payout_confirmed_at: encode_date(inv.payout_confirmed_at),
        valuta_mode: Some(val.mode.key().to_string()),
        valuta_countdown_start: val.countdown_start.map(|c| c.key().to_string()),
        valuta_countdown_days: encode_text(&val.countdown_days),
        valuta_skonto_percent: encode_text(&val.skonto_percent),
        valuta_sent_to_accountant_at: encode_date(val.sent_to_accountant_at),
        valuta_invoice_dispatch: val.invoice_dispatch.map(|d| d.key().to_string()),
        valuta_invoice_sent_at: encode_date(val.invoice_sent_at),
        valuta_shipped_at: encode_date(val.shipped_at),
        valuta_tracking_number: encode_text(&val.tracking_number),
        valuta_documents_arrived_at: encode_date(val.documents_arrived_at),
        valuta_payout_received_at: encode_date(val.payout_received_at),
        valuta_bank_fee_amount: encode_text(&val.bank_fee_amount),
        valuta_projected_payout_date: encode_date(valuta_projected_payout_date(val)),
        manual_note: encode_text(manual_note),
    }
}

/// Decode a persisted record back into a model and the manual note.
///
/// Total: any absent or malformed field decodes to its default. The
/// stored `valutaProjectedPayoutDate` is ignored on read; it is
/// re-derived from the countdown rule when needed.
pub fn decode(record: &WorkflowRecord) -> (WorkflowModel, String) {
    let mut model = WorkflowModel::default();

    model.flow_type = decode_key(&record.flow_type, FlowType::from_key);

    let inv = &mut model.invoitix;
    inv.sent_at = decode_date(&record.invoitix_sent_at);
    inv.decision = decode_key(&record.invoitix_decision, InvoitixDecision::from_key)
        .unwrap_or_default();
    inv.rejected_at = decode_date(&record.invoitix_rejected_at);
    inv.resubmitted_at = decode_date(&record.invoitix_resubmitted_at);
    inv.approved_at = decode_date(&record.invoitix_approved_at);
    inv.paid_out_at = decode_date(&record.invoitix_paid_out_at);
    inv.payout_reference = decode_text(&record.invoitix_payout_reference);
    inv.projected_income_added_at = decode_date(&record.invoitix_projected_income_added_at);
    inv.payout_confirmed_at = decode_date(&record.invoitix_payout_confirmed_at);

    let val = &mut model.valuta;
    val.mode = decode_key(&record.valuta_mode, ValutaMode::from_key).unwrap_or_default();
    val.countdown_start = decode_key(&record.valuta_countdown_start, CountdownStart::from_key);
    val.countdown_days =
        decode_numeric(&record.valuta_countdown_days, |t| parse_day_count(t).is_some());
    val.skonto_percent =
        decode_numeric(&record.valuta_skonto_percent, |t| parse_percent_bps(t).is_some());
    val.sent_to_accountant_at = decode_date(&record.valuta_sent_to_accountant_at);
    val.invoice_dispatch = decode_key(&record.valuta_invoice_dispatch, InvoiceDispatch::from_key);
    val.invoice_sent_at = decode_date(&record.valuta_invoice_sent_at);
    val.shipped_at = decode_date(&record.valuta_shipped_at);
    val.tracking_number = decode_text(&record.valuta_tracking_number);
    val.documents_arrived_at = decode_date(&record.valuta_documents_arrived_at);
    val.payout_received_at = decode_date(&record.valuta_payout_received_at);
    val.bank_fee_amount =
        decode_numeric(&record.valuta_bank_fee_amount, |t| parse_amount(t).is_some());

    let manual_note = decode_text(&record.manual_note);
    (model, manual_note)
}

/// Legacy flow-type inference: loads predating the structured workflow
/// carried boolean flags instead of a stored flow type.
pub fn infer_flow_type(model: &WorkflowModel, load: &LoadFacts) -> Option<FlowType> {
    model.flow_type.or(if load.uses_invoitix {
        Some(FlowType::Invoitix)
    } else if load.uses_valuta {
        Some(FlowType::Valuta)
    } else {
        None
    })
}

fn encode_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_date_key)
}

fn encode_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn decode_date(field: &Option<String>) -> Option<NaiveDate> {
    field.as_deref().and_then(parse_date_key)
}

fn decode_text(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn decode_key<T>(field: &Option<String>, from_key: impl Fn(&str) -> Option<T>) -> Option<T> {
    field.as_deref().and_then(from_key)
}

fn decode_numeric(field: &Option<String>, parses: impl Fn(&str) -> bool) -> String {
    let text = field.as_deref().map(str::trim).unwrap_or_default();
    if parses(text) {
        text.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_record_is_default_model() {
        let (model, note) = decode(&WorkflowRecord::default());
        assert_eq!(model, WorkflowModel::default());
        assert_eq!(note, "");
    }

    #[test]
    fn test_decode_normalizes_bad_numerics_to_blank() {
        let record = WorkflowRecord {
            valuta_countdown_days: Some("-3".to_string()),
            valuta_bank_fee_amount: Some("about five".to_string()),
            ..WorkflowRecord::default()
        };
        let (model, _) = decode(&record);
        assert_eq!(model.valuta.countdown_days, "");
        assert_eq!(model.valuta.bank_fee_amount, "");
    }

    #[test]
    fn test_encode_stores_derived_projection() {
        let mut model = WorkflowModel::default();
        model.flow_type = Some(FlowType::Valuta);
        model.valuta.countdown_start = Some(CountdownStart::EmailCopyInvoice);
        model.valuta.invoice_sent_at = parse_date_key("2024-01-01");
        model.valuta.countdown_days = "30".to_string();

        let record = encode(&model, "");
        assert_eq!(
            record.valuta_projected_payout_date.as_deref(),
            Some("2024-01-31")
        );
    }

    #[test]
    fn test_decode_ignores_stored_projection() {
        let record = WorkflowRecord {
            valuta_projected_payout_date: Some("2031-12-31".to_string()),
            ..WorkflowRecord::default()
        };
        let (model, _) = decode(&record);
        assert_eq!(model, WorkflowModel::default());
    }

    #[test]
    fn test_inference_prefers_stored_flow_type() {
        let mut model = WorkflowModel::default();
        model.flow_type = Some(FlowType::Valuta);
        let load = LoadFacts::new(100_000).with_legacy_invoitix();
        assert_eq!(infer_flow_type(&model, &load), Some(FlowType::Valuta));
    }

    #[test]
    fn test_inference_from_legacy_flags() {
        let model = WorkflowModel::default();
        assert_eq!(
            infer_flow_type(&model, &LoadFacts::new(0).with_legacy_invoitix()),
            Some(FlowType::Invoitix)
        );
        assert_eq!(
            infer_flow_type(&model, &LoadFacts::new(0).with_legacy_valuta()),
            Some(FlowType::Valuta)
        );
        assert_eq!(infer_flow_type(&model, &LoadFacts::new(0)), None);
    }
}
