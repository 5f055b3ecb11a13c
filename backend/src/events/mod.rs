//! Workflow event logging for auditing.
//!
//! Every confirmed step appends one event. The log makes the
//! settlement history of a payment reconstructible without reading
//! store diffs: what was confirmed, when, and with which derived
//! amounts.

use chrono::NaiveDate;

use crate::core::money::Cents;
use crate::models::workflow::{CountdownStart, FlowType, InvoitixDecision, ValutaMode};

/// A confirmed workflow action on one payment.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// Settlement path selected (or re-selected while unlocked).
    FlowSelected {
        payment_id: String,
        flow: FlowType,
        on: NaiveDate,
    },

    /// Valuta mode / countdown rule configured.
    ValutaConfigured {
        payment_id: String,
        mode: ValutaMode,
        countdown_start: Option<CountdownStart>,
        on: NaiveDate,
    },

    /// Invoice submitted to the factoring provider.
    InvoitixSent { payment_id: String, on: NaiveDate },

    /// Factoring provider decision recorded.
    InvoitixDecisionRecorded {
        payment_id: String,
        decision: InvoitixDecision,
        on: NaiveDate,
    },

    /// Rejected submission sent again.
    InvoitixResubmitted { payment_id: String, on: NaiveDate },

    /// Factoring payout confirmed; payment marked paid.
    InvoitixPayoutConfirmed {
        payment_id: String,
        amount: Cents,
        on: NaiveDate,
    },

    /// Invoice copy emailed to the broker.
    InvoiceEmailed { payment_id: String, on: NaiveDate },

    /// Paperwork handed to the accountant.
    SentToAccountant { payment_id: String, on: NaiveDate },

    /// Original documents shipped.
    DocumentsShipped {
        payment_id: String,
        tracking_number: String,
        on: NaiveDate,
    },

    /// Original documents arrived at the broker.
    DocumentsArrived { payment_id: String, on: NaiveDate },

    /// Broker payout received; payment marked paid.
    PayoutReceived {
        payment_id: String,
        amount: Cents,
        on: NaiveDate,
    },

    /// Bank fee recorded after payout; amount recomputed.
    BankFeeRecorded {
        payment_id: String,
        fee: Cents,
        amount: Cents,
        on: NaiveDate,
    },

    /// Payment marked paid outside a step confirmation.
    MarkedPaid { payment_id: String, on: NaiveDate },
}

impl WorkflowEvent {
    /// The payment this event belongs to.
    pub fn payment_id(&self) -> &str {
        match self {
            WorkflowEvent::FlowSelected { payment_id, .. }
            | WorkflowEvent::ValutaConfigured { payment_id, .. }
            | WorkflowEvent::InvoitixSent { payment_id, .. }
            | WorkflowEvent::InvoitixDecisionRecorded { payment_id, .. }
            | WorkflowEvent::InvoitixResubmitted { payment_id, .. }
            | WorkflowEvent::InvoitixPayoutConfirmed { payment_id, .. }
            | WorkflowEvent::InvoiceEmailed { payment_id, .. }
            | WorkflowEvent::SentToAccountant { payment_id, .. }
            | WorkflowEvent::DocumentsShipped { payment_id, .. }
            | WorkflowEvent::DocumentsArrived { payment_id, .. }
            | WorkflowEvent::PayoutReceived { payment_id, .. }
            | WorkflowEvent::BankFeeRecorded { payment_id, .. }
            | WorkflowEvent::MarkedPaid { payment_id, .. } => payment_id,
        }
    }

    /// The calendar date the action was confirmed on.
    pub fn date(&self) -> NaiveDate {
        match self {
            WorkflowEvent::FlowSelected { on, .. }
            | WorkflowEvent::ValutaConfigured { on, .. }
            | WorkflowEvent::InvoitixSent { on, .. }
            | WorkflowEvent::InvoitixDecisionRecorded { on, .. }
            | WorkflowEvent::InvoitixResubmitted { on, .. }
            | WorkflowEvent::InvoitixPayoutConfirmed { on, .. }
            | WorkflowEvent::InvoiceEmailed { on, .. }
            | WorkflowEvent::SentToAccountant { on, .. }
            | WorkflowEvent::DocumentsShipped { on, .. }
            | WorkflowEvent::DocumentsArrived { on, .. }
            | WorkflowEvent::PayoutReceived { on, .. }
            | WorkflowEvent::BankFeeRecorded { on, .. }
            | WorkflowEvent::MarkedPaid { on, .. } => *on,
        }
    }
}

/// Append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<WorkflowEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: WorkflowEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[WorkflowEvent] {
        &self.events
    }

    /// Events for one payment, in confirmation order.
    pub fn for_payment<'a>(
        &'a self,
        payment_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkflowEvent> {
        self.events
            .iter()
            .filter(move |event| event.payment_id() == payment_id)
    }
}
