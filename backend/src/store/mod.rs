//! Payment record store contract.
//!
//! All blocking I/O lives behind this trait; the engine itself is pure
//! computation. A transport failure surfaces to the caller as-is and
//! leaves the in-memory workflow model untouched (the engine only
//! advances the model after a successful write).
//!
//! The crate ships an in-memory implementation used by tests and by
//! callers that embed the engine without an external backend.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{NewPayment, PaymentRecord, PaymentStatus, PaymentUpdate};

/// Errors from the payment record store.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("payment not found: {0}")]
    NotFound(String),

    #[error("payment store transport error: {0}")]
    Transport(String),
}

/// The external payment record store, keyed by load and by payment ID.
pub trait PaymentStore {
    /// Fetch the payment record owned by a load, if one exists.
    fn get(&self, load_id: &str) -> Result<Option<PaymentRecord>, StoreError>;

    /// Create a payment record for a load.
    fn create(&mut self, new: NewPayment) -> Result<PaymentRecord, StoreError>;

    /// Apply a partial update and return the updated record.
    fn update(&mut self, payment_id: &str, patch: PaymentUpdate)
        -> Result<PaymentRecord, StoreError>;

    /// Mark a payment as paid on the given date.
    fn mark_paid(&mut self, payment_id: &str, paid_date: NaiveDate)
        -> Result<PaymentRecord, StoreError>;
}

/// HashMap-backed store with uuid-v4 payment IDs.
///
/// # Example
/// ```
/// use load_settlement_core_rs::models::NewPayment;
/// use load_settlement_core_rs::store::{InMemoryPaymentStore, PaymentStore};
///
/// let mut store = InMemoryPaymentStore::new();
/// let record = store
///     .create(NewPayment {
///         load_id: "load-17".to_string(),
///         amount: 100_000,
///         ..NewPayment::default()
///     })
///     .unwrap();
/// assert_eq!(store.get("load-17").unwrap().unwrap().id, record.id);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPaymentStore {
    payments: HashMap<String, PaymentRecord>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Fetch by payment ID (the trait fetches by load ID).
    pub fn get_by_id(&self, payment_id: &str) -> Option<&PaymentRecord> {
        self.payments.get(payment_id)
    }
}

impl PaymentStore for InMemoryPaymentStore {
    fn get(&self, load_id: &str) -> Result<Option<PaymentRecord>, StoreError> {
        Ok(self
            .payments
            .values()
            .find(|record| record.load_id == load_id)
            .cloned())
    }

    fn create(&mut self, new: NewPayment) -> Result<PaymentRecord, StoreError> {
        let record = PaymentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            load_id: new.load_id,
            status: new.status,
            amount: new.amount,
            issue_date: new.issue_date,
            due_date: new.due_date,
            paid_date: None,
            notes: new.notes,
            workflow: new.workflow,
        };
        self.payments.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(
        &mut self,
        payment_id: &str,
        patch: PaymentUpdate,
    ) -> Result<PaymentRecord, StoreError> {
        let record = self
            .payments
            .get_mut(payment_id)
            .ok_or_else(|| StoreError::NotFound(payment_id.to_string()))?;
        record.apply(&patch);
        Ok(record.clone())
    }

    fn mark_paid(
        &mut self,
        payment_id: &str,
        paid_date: NaiveDate,
    ) -> Result<PaymentRecord, StoreError> {
        let record = self
            .payments
            .get_mut(payment_id)
            .ok_or_else(|| StoreError::NotFound(payment_id.to_string()))?;
        record.status = PaymentStatus::Paid;
        record.paid_date = Some(paid_date);
        Ok(record.clone())
    }
}
