//! Workflow codec tests: round-trip, degradation, wire shape.

use chrono::NaiveDate;
use load_settlement_core_rs::codec::{decode, encode, WorkflowRecord};
use load_settlement_core_rs::models::workflow::{
    CountdownStart, FlowType, InvoiceDispatch, InvoitixDecision, ValutaMode,
};
use load_settlement_core_rs::models::WorkflowModel;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn populated_valuta_model() -> WorkflowModel {
    let mut model = WorkflowModel::default();
    model.flow_type = Some(FlowType::Valuta);
    model.valuta.mode = ValutaMode::Skonto;
    model.valuta.countdown_start = Some(CountdownStart::OriginalsReceived);
    model.valuta.countdown_days = "10".to_string();
    model.valuta.skonto_percent = "2".to_string();
    model.valuta.invoice_dispatch = Some(InvoiceDispatch::WaitAndShipOriginals);
    model.valuta.shipped_at = date(2024, 4, 2);
    model.valuta.tracking_number = "RR123456785DE".to_string();
    model.valuta.documents_arrived_at = date(2024, 4, 5);
    model.valuta.payout_received_at = date(2024, 4, 15);
    model.valuta.bank_fee_amount = "4.90".to_string();
    model
}

fn populated_invoitix_model() -> WorkflowModel {
    let mut model = WorkflowModel::default();
    model.flow_type = Some(FlowType::Invoitix);
    model.invoitix.sent_at = date(2024, 5, 2);
    model.invoitix.decision = InvoitixDecision::Approved;
    model.invoitix.approved_at = date(2024, 5, 3);
    model.invoitix.paid_out_at = date(2024, 5, 4);
    model.invoitix.payout_reference = "INV-2024-0042".to_string();
    model.invoitix.payout_confirmed_at = date(2024, 5, 4);
    model
}

#[test]
fn test_round_trip_default_model() {
    let model = WorkflowModel::default();
    let (decoded, note) = decode(&encode(&model, ""));
    assert_eq!(decoded, model);
    assert_eq!(note, "");
}

#[test]
fn test_round_trip_valuta_model_with_note() {
    let model = populated_valuta_model();
    let (decoded, note) = decode(&encode(&model, "chase the broker on Friday"));
    assert_eq!(decoded, model);
    assert_eq!(note, "chase the broker on Friday");
}

#[test]
fn test_round_trip_invoitix_model() {
    let model = populated_invoitix_model();
    let (decoded, _) = decode(&encode(&model, ""));
    assert_eq!(decoded, model);
}

#[test]
fn test_encode_derives_and_stores_projection() {
    let record = encode(&populated_valuta_model(), "");
    // documents arrived 2024-04-05 + 10 days
    assert_eq!(
        record.valuta_projected_payout_date.as_deref(),
        Some("2024-04-15")
    );
}

#[test]
fn test_decode_survives_malformed_record() {
    let record = WorkflowRecord {
        flow_type: Some("CHEQUE".to_string()),
        invoitix_sent_at: Some("02.05.2024".to_string()),
        invoitix_decision: Some("MAYBE".to_string()),
        valuta_countdown_start: Some("".to_string()),
        valuta_countdown_days: Some("ten".to_string()),
        valuta_bank_fee_amount: Some("-4.90".to_string()),
        ..WorkflowRecord::default()
    };
    let (model, note) = decode(&record);
    assert_eq!(model, WorkflowModel::default());
    assert_eq!(note, "");
}

#[test]
fn test_wire_field_names_are_camel_case() {
    let json = serde_json::to_value(encode(&populated_valuta_model(), "note")).unwrap();
    let object = json.as_object().unwrap();
    assert!(object.contains_key("flowType"));
    assert!(object.contains_key("valutaCountdownStart"));
    assert!(object.contains_key("valutaProjectedPayoutDate"));
    assert!(object.contains_key("manualNote"));
    assert_eq!(object["valutaTrackingNumber"], "RR123456785DE");
}

#[test]
fn test_record_deserializes_from_sparse_json() {
    // A record written by an older client that only knew two fields.
    let record: WorkflowRecord =
        serde_json::from_str(r#"{"flowType":"INVOITIX","invoitixSentAt":"2024-05-02"}"#).unwrap();
    let (model, _) = decode(&record);
    assert_eq!(model.flow_type, Some(FlowType::Invoitix));
    assert_eq!(model.invoitix.sent_at, date(2024, 5, 2));
    assert_eq!(model.valuta.countdown_days, "");
}
