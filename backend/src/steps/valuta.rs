//! Valuta branch: the step sequence depends on the countdown-start
//! rule.
//!
//! Under `EmailCopyInvoice` the flow is two steps (email the invoice,
//! then wait out the countdown). Under `OriginalsReceived` it is four
//! (wait for the driver to return the originals, ship them with a
//! tracking number, record their arrival, then wait out the countdown).
//! The optional bank-fee sub-step opens only after the payout landed.

use super::StepState;
use crate::fees::{valuta_countdown_start_date, valuta_projected_payout_date};
use crate::models::workflow::CountdownStart;
use crate::models::{LoadFacts, WorkflowModel};

/// Steps of the valuta flow. Which subset applies, and in which order,
/// is decided by the countdown-start rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValutaStep {
    /// Informational: the driver still has the original documents.
    WaitingOnDriver,
    /// Originals shipped to the broker (tracking number required).
    DocumentsSent,
    /// Originals arrived at the broker.
    DocumentsArrived,
    /// Invoice copy emailed to the broker.
    EmailSent,
    /// Countdown toward expected payout, then payout confirmation.
    CountdownAndPayout,
}

/// Step sequence for the email-copy variant.
pub const EMAIL_COPY_SEQUENCE: [ValutaStep; 2] =
    [ValutaStep::EmailSent, ValutaStep::CountdownAndPayout];

/// Step sequence for the originals variant.
pub const ORIGINALS_SEQUENCE: [ValutaStep; 4] = [
    ValutaStep::WaitingOnDriver,
    ValutaStep::DocumentsSent,
    ValutaStep::DocumentsArrived,
    ValutaStep::CountdownAndPayout,
];

/// The linear step sequence selected by the countdown-start rule.
///
/// Empty until the rule is chosen; there is nothing to progress
/// through before then.
pub fn valuta_sequence(countdown_start: Option<CountdownStart>) -> &'static [ValutaStep] {
    match countdown_start {
        Some(CountdownStart::EmailCopyInvoice) => &EMAIL_COPY_SEQUENCE,
        Some(CountdownStart::OriginalsReceived) => &ORIGINALS_SEQUENCE,
        None => &[],
    }
}

/// Derive the state of one valuta step.
pub fn valuta_step_state(model: &WorkflowModel, load: &LoadFacts, step: ValutaStep) -> StepState {
    let val = &model.valuta;
    match step {
        ValutaStep::WaitingOnDriver => {
            if val.shipped_at.is_some() {
                StepState::Done
            } else if load.is_completed {
                StepState::InProgress
            } else {
                StepState::NotStarted
            }
        }
        ValutaStep::DocumentsSent => {
            if val.shipped_at.is_some() {
                StepState::Done
            } else if load.is_completed {
                StepState::InProgress
            } else {
                StepState::NotStarted
            }
        }
        ValutaStep::DocumentsArrived => {
            if val.documents_arrived_at.is_some() {
                StepState::Done
            } else if val.shipped_at.is_some() {
                StepState::InProgress
            } else {
                StepState::Locked
            }
        }
        ValutaStep::EmailSent => {
            if val.invoice_sent_at.is_some() {
                StepState::Done
            } else if load.is_completed {
                StepState::InProgress
            } else {
                StepState::NotStarted
            }
        }
        ValutaStep::CountdownAndPayout => {
            if val.payout_received_at.is_some() {
                StepState::Done
            } else if valuta_countdown_start_date(val).is_none() {
                StepState::Locked
            } else if valuta_projected_payout_date(val).is_some() {
                StepState::InProgress
            } else {
                // Countdown started but the day count does not parse;
                // no projection to wait on yet.
                StepState::NotStarted
            }
        }
    }
}

/// Derive the applicable valuta steps in sequence order.
pub fn valuta_steps(model: &WorkflowModel, load: &LoadFacts) -> Vec<(ValutaStep, StepState)> {
    valuta_sequence(model.valuta.countdown_start)
        .iter()
        .map(|&step| (step, valuta_step_state(model, load, step)))
        .collect()
}

/// The optional post-terminal bank-fee sub-step.
///
/// Editable once the payout landed; read-only once a non-blank fee is
/// persisted.
pub fn bank_fee_step_state(model: &WorkflowModel) -> StepState {
    let val = &model.valuta;
    if val.payout_received_at.is_none() {
        StepState::Locked
    } else if val.bank_fee_amount.trim().is_empty() {
        StepState::InProgress
    } else {
        StepState::Done
    }
}
