//! Payment record model and partial-update patch.
//!
//! The payment record is an external collaborator entity: the engine
//! reads it through [`crate::store::PaymentStore`] and mutates it only
//! through explicit patches produced by step confirmations. The
//! `workflow` sub-record is the persisted form of
//! [`crate::models::workflow::WorkflowModel`].

use chrono::NaiveDate;

use crate::codec::WorkflowRecord;
use crate::core::money::Cents;

/// Payment status on the external record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn key(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn from_key(text: &str) -> Option<Self> {
        match text.trim() {
            "UNPAID" => Some(PaymentStatus::Unpaid),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// One load's payment record as held by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentRecord {
    pub id: String,
    pub load_id: String,
    pub status: PaymentStatus,
    /// Current invoice/payout amount in cents.
    pub amount: Cents,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    /// Legacy free text, or a tagged structured payload on records
    /// written before the workflow sub-record existed.
    pub notes: String,
    pub workflow: WorkflowRecord,
}

/// Fields for creating a payment record.
#[derive(Debug, Clone, Default)]
pub struct NewPayment {
    pub load_id: String,
    pub amount: Cents,
    pub status: PaymentStatus,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: String,
    pub workflow: WorkflowRecord,
}

/// Partial update of a payment record.
///
/// `None` means "leave unchanged" -- step confirmations only ever move
/// fields forward, they never clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentUpdate {
    pub amount: Option<Cents>,
    pub status: Option<PaymentStatus>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub workflow: Option<WorkflowRecord>,
}

impl PaymentRecord {
    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &PaymentUpdate) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(issue_date) = patch.issue_date {
            self.issue_date = Some(issue_date);
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(workflow) = &patch.workflow {
            self.workflow = workflow.clone();
        }
    }
}
