//! Invoitix branch: a linear three-step sequence, terminal at the
//! payout confirmation.

use super::StepState;
use crate::models::{LoadFacts, WorkflowModel};

/// Steps of the invoitix (factoring) flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoitixStep {
    /// Send the invoice to the factoring provider.
    Send,
    /// Read-only projection of fee, payout and expected date.
    ProjectedPayout,
    /// Confirm the payout landed.
    ConfirmPayout,
}

/// Ordered step sequence of the invoitix flow.
pub const INVOITIX_SEQUENCE: [InvoitixStep; 3] = [
    InvoitixStep::Send,
    InvoitixStep::ProjectedPayout,
    InvoitixStep::ConfirmPayout,
];

/// Derive the state of one invoitix step.
pub fn invoitix_step_state(
    model: &WorkflowModel,
    load: &LoadFacts,
    step: InvoitixStep,
) -> StepState {
    let inv = &model.invoitix;
    let sent = inv.sent_at.is_some();
    match step {
        InvoitixStep::Send => {
            if sent {
                StepState::Done
            } else if load.is_completed {
                StepState::InProgress
            } else {
                StepState::NotStarted
            }
        }
        // Informational: becomes meaningful as soon as the submission
        // date exists, with nothing left to do.
        InvoitixStep::ProjectedPayout => {
            if sent {
                StepState::Done
            } else {
                StepState::Locked
            }
        }
        InvoitixStep::ConfirmPayout => {
            if inv.payout_confirmed_at.is_some() {
                StepState::Done
            } else if sent {
                StepState::InProgress
            } else {
                StepState::Locked
            }
        }
    }
}

/// Derive all invoitix steps in sequence order.
pub fn invoitix_steps(model: &WorkflowModel, load: &LoadFacts) -> Vec<(InvoitixStep, StepState)> {
    INVOITIX_SEQUENCE
        .iter()
        .map(|&step| (step, invoitix_step_state(model, load, step)))
        .collect()
}
