//! Valuta step-state derivation tests, both countdown variants.

use chrono::NaiveDate;
use load_settlement_core_rs::models::workflow::{CountdownStart, FlowType};
use load_settlement_core_rs::models::{LoadFacts, WorkflowModel};
use load_settlement_core_rs::steps::{
    bank_fee_step_state, payout_status, valuta_steps, PayoutStatus, StepState, ValutaStep,
};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn valuta_model(rule: CountdownStart) -> WorkflowModel {
    let mut model = WorkflowModel::default();
    model.flow_type = Some(FlowType::Valuta);
    model.valuta.countdown_start = Some(rule);
    model.valuta.countdown_days = "10".to_string();
    model
}

fn states(model: &WorkflowModel, load: &LoadFacts) -> Vec<StepState> {
    valuta_steps(model, load)
        .into_iter()
        .map(|(_, state)| state)
        .collect()
}

// ==========================================
// Variant A: email copy invoice (2 steps)
// ==========================================

#[test]
fn test_email_variant_sequence() {
    let model = valuta_model(CountdownStart::EmailCopyInvoice);
    let load = LoadFacts::new(100_000).completed();
    let steps: Vec<ValutaStep> = valuta_steps(&model, &load)
        .into_iter()
        .map(|(step, _)| step)
        .collect();
    assert_eq!(
        steps,
        vec![ValutaStep::EmailSent, ValutaStep::CountdownAndPayout]
    );
}

#[test]
fn test_email_variant_progression() {
    let mut model = valuta_model(CountdownStart::EmailCopyInvoice);
    let load = LoadFacts::new(100_000).completed();

    assert_eq!(
        states(&model, &load),
        vec![StepState::InProgress, StepState::Locked]
    );

    model.valuta.invoice_sent_at = date(2024, 5, 2);
    assert_eq!(
        states(&model, &load),
        vec![StepState::Done, StepState::InProgress]
    );

    model.valuta.payout_received_at = date(2024, 6, 1);
    assert_eq!(states(&model, &load), vec![StepState::Done, StepState::Done]);
    assert_eq!(payout_status(&model, &load), PayoutStatus::PayoutConfirmed);
}

// ==========================================
// Variant B: originals received (4 steps)
// ==========================================

#[test]
fn test_originals_variant_sequence() {
    let model = valuta_model(CountdownStart::OriginalsReceived);
    let load = LoadFacts::new(100_000).completed();
    let steps: Vec<ValutaStep> = valuta_steps(&model, &load)
        .into_iter()
        .map(|(step, _)| step)
        .collect();
    assert_eq!(
        steps,
        vec![
            ValutaStep::WaitingOnDriver,
            ValutaStep::DocumentsSent,
            ValutaStep::DocumentsArrived,
            ValutaStep::CountdownAndPayout
        ]
    );
}

#[test]
fn test_originals_variant_label_chain() {
    let mut model = valuta_model(CountdownStart::OriginalsReceived);
    let load = LoadFacts::new(100_000).completed();

    assert_eq!(
        payout_status(&model, &load),
        PayoutStatus::WaitingForDriverReturn
    );

    model.valuta.shipped_at = date(2024, 4, 2);
    model.valuta.tracking_number = "RR123456785DE".to_string();
    assert_eq!(
        payout_status(&model, &load),
        PayoutStatus::WaitingForOriginals
    );

    model.valuta.documents_arrived_at = date(2024, 4, 5);
    assert_eq!(
        payout_status(&model, &load),
        PayoutStatus::CountdownInProgress
    );

    model.valuta.payout_received_at = date(2024, 4, 15);
    assert_eq!(payout_status(&model, &load), PayoutStatus::PayoutConfirmed);
}

#[test]
fn test_arrival_step_locked_until_shipped() {
    let model = valuta_model(CountdownStart::OriginalsReceived);
    let load = LoadFacts::new(100_000).completed();
    assert_eq!(
        states(&model, &load),
        vec![
            StepState::InProgress,
            StepState::InProgress,
            StepState::Locked,
            StepState::Locked
        ]
    );
}

#[test]
fn test_no_rule_means_no_sequence_and_setup_label() {
    let mut model = WorkflowModel::default();
    model.flow_type = Some(FlowType::Valuta);
    let load = LoadFacts::new(100_000).completed();
    assert!(valuta_steps(&model, &load).is_empty());
    assert_eq!(
        payout_status(&model, &load),
        PayoutStatus::WaitingForFlowSetup
    );
}

// ==========================================
// Bank-fee sub-step
// ==========================================

#[test]
fn test_bank_fee_lifecycle() {
    let mut model = valuta_model(CountdownStart::OriginalsReceived);
    assert_eq!(bank_fee_step_state(&model), StepState::Locked);

    model.valuta.payout_received_at = date(2024, 4, 15);
    assert_eq!(bank_fee_step_state(&model), StepState::InProgress);

    model.valuta.bank_fee_amount = "4.90".to_string();
    assert_eq!(bank_fee_step_state(&model), StepState::Done);
}
