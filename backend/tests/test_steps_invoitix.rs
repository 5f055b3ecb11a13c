//! Invoitix step-state derivation tests.

use chrono::NaiveDate;
use load_settlement_core_rs::models::workflow::FlowType;
use load_settlement_core_rs::models::{LoadFacts, WorkflowModel};
use load_settlement_core_rs::steps::{
    invoitix_steps, payout_status, InvoitixStep, PayoutStatus, StepState,
};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn invoitix_model() -> WorkflowModel {
    let mut model = WorkflowModel::default();
    model.flow_type = Some(FlowType::Invoitix);
    model
}

fn states(model: &WorkflowModel, load: &LoadFacts) -> Vec<StepState> {
    invoitix_steps(model, load)
        .into_iter()
        .map(|(_, state)| state)
        .collect()
}

#[test]
fn test_sequence_order_is_fixed() {
    let model = invoitix_model();
    let load = LoadFacts::new(100_000);
    let steps: Vec<InvoitixStep> = invoitix_steps(&model, &load)
        .into_iter()
        .map(|(step, _)| step)
        .collect();
    assert_eq!(
        steps,
        vec![
            InvoitixStep::Send,
            InvoitixStep::ProjectedPayout,
            InvoitixStep::ConfirmPayout
        ]
    );
}

#[test]
fn test_nothing_actionable_before_delivery() {
    let model = invoitix_model();
    let load = LoadFacts::new(100_000);
    assert_eq!(
        states(&model, &load),
        vec![StepState::NotStarted, StepState::Locked, StepState::Locked]
    );
    assert_eq!(
        payout_status(&model, &load),
        PayoutStatus::WaitingToBeCompleted
    );
}

#[test]
fn test_delivery_makes_send_actionable() {
    let model = invoitix_model();
    let load = LoadFacts::new(100_000).completed();
    assert_eq!(
        states(&model, &load),
        vec![StepState::InProgress, StepState::Locked, StepState::Locked]
    );
    assert_eq!(
        payout_status(&model, &load),
        PayoutStatus::ReadyToSendToInvoitix
    );
}

#[test]
fn test_send_completes_projection_and_enables_confirm() {
    let mut model = invoitix_model();
    model.invoitix.sent_at = date(2024, 5, 2);
    let load = LoadFacts::new(100_000).completed();
    assert_eq!(
        states(&model, &load),
        vec![StepState::Done, StepState::Done, StepState::InProgress]
    );
    assert_eq!(payout_status(&model, &load), PayoutStatus::WaitingForPayout);
}

#[test]
fn test_confirmed_payout_is_terminal() {
    let mut model = invoitix_model();
    model.invoitix.sent_at = date(2024, 5, 2);
    model.invoitix.paid_out_at = date(2024, 5, 4);
    model.invoitix.payout_confirmed_at = date(2024, 5, 4);
    let load = LoadFacts::new(100_000).completed();
    assert_eq!(
        states(&model, &load),
        vec![StepState::Done, StepState::Done, StepState::Done]
    );
    assert_eq!(payout_status(&model, &load), PayoutStatus::PayoutConfirmed);
}
