//! Derived payout status label.
//!
//! The status is never stored; it is recomputed from the model and the
//! load's completion state every time it is displayed.

use std::fmt;

use crate::models::workflow::{CountdownStart, FlowType};
use crate::models::{LoadFacts, WorkflowModel};

/// Human-readable settlement status of one payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutStatus {
    FlowNotSet,
    WaitingToBeCompleted,
    ReadyToSendToInvoitix,
    WaitingForPayout,
    WaitingForFlowSetup,
    WaitingForDriverReturn,
    WaitingForOriginals,
    CountdownInProgress,
    PayoutConfirmed,
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayoutStatus::FlowNotSet => "Flow not set",
            PayoutStatus::WaitingToBeCompleted => "Waiting to be completed",
            PayoutStatus::ReadyToSendToInvoitix => "Ready to send to Invoitix",
            PayoutStatus::WaitingForPayout => "Waiting for payout",
            PayoutStatus::WaitingForFlowSetup => "Waiting for flow setup",
            PayoutStatus::WaitingForDriverReturn => "Waiting for driver return",
            PayoutStatus::WaitingForOriginals => "Waiting for originals to arrive",
            PayoutStatus::CountdownInProgress => "Countdown in progress",
            PayoutStatus::PayoutConfirmed => "Payout confirmed",
        };
        f.write_str(label)
    }
}

/// Derive the payout status for a payment's workflow.
pub fn payout_status(model: &WorkflowModel, load: &LoadFacts) -> PayoutStatus {
    match model.flow_type {
        None => PayoutStatus::FlowNotSet,
        Some(FlowType::Invoitix) => {
            let inv = &model.invoitix;
            if inv.payout_confirmed_at.is_some() {
                PayoutStatus::PayoutConfirmed
            } else if inv.sent_at.is_some() {
                PayoutStatus::WaitingForPayout
            } else if load.is_completed {
                PayoutStatus::ReadyToSendToInvoitix
            } else {
                PayoutStatus::WaitingToBeCompleted
            }
        }
        Some(FlowType::Valuta) => {
            let val = &model.valuta;
            if val.payout_received_at.is_some() {
                return PayoutStatus::PayoutConfirmed;
            }
            if !load.is_completed {
                return PayoutStatus::WaitingToBeCompleted;
            }
            match val.countdown_start {
                None => PayoutStatus::WaitingForFlowSetup,
                Some(CountdownStart::EmailCopyInvoice) => {
                    if val.invoice_sent_at.is_some() {
                        PayoutStatus::CountdownInProgress
                    } else {
                        PayoutStatus::WaitingForFlowSetup
                    }
                }
                Some(CountdownStart::OriginalsReceived) => {
                    if val.documents_arrived_at.is_some() {
                        PayoutStatus::CountdownInProgress
                    } else if val.shipped_at.is_some() {
                        PayoutStatus::WaitingForOriginals
                    } else {
                        PayoutStatus::WaitingForDriverReturn
                    }
                }
            }
        }
    }
}
