//! Settlement engine.
//!
//! Thin orchestration over the pure transition chokepoint: open (or
//! create) a load's payment, execute step commands against the store,
//! and keep the audit log.
//!
//! # Critical Invariants
//!
//! 1. No partial apply: the store write happens first; the advanced
//!    model is returned only if the write succeeded
//! 2. Decode failures never surface; legacy notes degrade to defaults
//! 3. The engine holds no workflow state; the caller owns the current
//!    model slot

use chrono::NaiveDate;
use thiserror::Error;

use crate::codec::{decode, decode_legacy_notes, infer_flow_type};
use crate::engine::transition::{apply_step, StepCommand, StepError};
use crate::events::{EventLog, WorkflowEvent};
use crate::models::{LoadFacts, NewPayment, PaymentRecord, WorkflowModel};
use crate::store::{PaymentStore, StoreError};

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A step precondition failed; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] StepError),

    /// The external store call failed; the model was not advanced.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A load's payment as opened by the engine: the stored record, the
/// decoded (or defaulted) workflow model, and the manual note.
#[derive(Debug, Clone)]
pub struct OpenedPayment {
    pub record: PaymentRecord,
    pub model: WorkflowModel,
    pub manual_note: String,
}

/// Orchestrates step confirmations against a payment store.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use load_settlement_core_rs::engine::{SettlementEngine, StepCommand};
/// use load_settlement_core_rs::models::workflow::FlowType;
/// use load_settlement_core_rs::models::LoadFacts;
/// use load_settlement_core_rs::store::InMemoryPaymentStore;
///
/// let mut engine = SettlementEngine::new(InMemoryPaymentStore::new());
/// let load = LoadFacts::new(100_000).completed();
/// let opened = engine.open_payment("load-17", &load).unwrap();
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let model = engine
///     .execute(
///         &opened.record.id,
///         &load,
///         &opened.model,
///         &opened.manual_note,
///         StepCommand::SelectFlow { flow: FlowType::Invoitix },
///         today,
///     )
///     .unwrap();
/// assert_eq!(model.flow_type, Some(FlowType::Invoitix));
/// ```
#[derive(Debug)]
pub struct SettlementEngine<S: PaymentStore> {
    store: S,
    log: EventLog,
}

impl<S: PaymentStore> SettlementEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            log: EventLog::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// Fetch the payment owned by a load, creating a default one if
    /// none exists yet.
    ///
    /// Decoding prefers the structured workflow sub-record; when that
    /// is empty and the notes field is not, the legacy notes path is
    /// tried. Missing flow types fall back to the load's legacy flags.
    pub fn open_payment(
        &mut self,
        load_id: &str,
        load: &LoadFacts,
    ) -> Result<OpenedPayment, EngineError> {
        if let Some(record) = self.store.get(load_id)? {
            let (mut model, mut manual_note) = decode(&record.workflow);
            let untouched = model == WorkflowModel::default() && manual_note.is_empty();
            if untouched && !record.notes.is_empty() {
                let decoded = decode_legacy_notes(&record.notes);
                model = decoded.model;
                manual_note = decoded.manual_note;
            }
            model.flow_type = infer_flow_type(&model, load);
            return Ok(OpenedPayment {
                record,
                model,
                manual_note,
            });
        }

        let record = self.store.create(NewPayment {
            load_id: load_id.to_string(),
            amount: load.base_amount,
            ..NewPayment::default()
        })?;
        let mut model = WorkflowModel::default();
        model.flow_type = infer_flow_type(&model, load);
        Ok(OpenedPayment {
            record,
            model,
            manual_note: String::new(),
        })
    }

    /// Execute one step command.
    ///
    /// Runs the pure transition, writes the resulting patch to the
    /// store, and only then logs the event and returns the advanced
    /// model. A failed write surfaces as [`EngineError::Store`] and the
    /// caller keeps its previous model.
    pub fn execute(
        &mut self,
        payment_id: &str,
        load: &LoadFacts,
        model: &WorkflowModel,
        manual_note: &str,
        cmd: StepCommand,
        today: NaiveDate,
    ) -> Result<WorkflowModel, EngineError> {
        let outcome = apply_step(model, load, payment_id, manual_note, cmd, today)?;
        self.store.update(payment_id, outcome.update)?;
        self.log.push(outcome.event);
        Ok(outcome.model)
    }

    /// Mark a payment paid outside the step flow.
    ///
    /// Refused while no settlement flow is selected; the paid status
    /// would be meaningless without one.
    pub fn mark_paid(
        &mut self,
        payment_id: &str,
        model: &WorkflowModel,
        paid_date: NaiveDate,
    ) -> Result<PaymentRecord, EngineError> {
        if model.flow_type.is_none() {
            return Err(StepError::FlowNotSelected.into());
        }
        let record = self.store.mark_paid(payment_id, paid_date)?;
        self.log.push(WorkflowEvent::MarkedPaid {
            payment_id: payment_id.to_string(),
            on: paid_date,
        });
        Ok(record)
    }
}
