//! Load Payment Settlement Core - Rust Engine
//!
//! Tracks how money owed for a delivered load moves from "invoice
//! submitted" to "cash received", across two mutually exclusive
//! settlement paths: Invoitix factoring (fast payout for a fee) and
//! Valuta direct invoicing (countdown from a triggering event, with an
//! optional Skonto early-payment discount).
//!
//! # Architecture
//!
//! - **core**: Calendar-date keys and integer-cents money
//! - **models**: Domain types (WorkflowModel, LoadFacts, PaymentRecord)
//! - **fees**: Stateless fee/payout/date-projection calculator
//! - **steps**: Step-state derivation and the payout status label
//! - **policy**: Flow-edit lock (one-shot settlement path selection)
//! - **codec**: Persisted-record codec and legacy notes fallback
//! - **store**: Payment record store contract + in-memory impl
//! - **engine**: Pure transition chokepoint + store-backed executor
//! - **events**: Audit log of confirmed workflow actions
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents); rounding is half-up
//! 2. All computation is pure and synchronous; `today` is an argument
//! 3. Decoding persisted data never fails; it degrades to defaults
//! 4. A step confirmation either fully persists or leaves the model
//!    untouched

// Module declarations
pub mod codec;
pub mod core;
pub mod engine;
pub mod events;
pub mod fees;
pub mod models;
pub mod policy;
pub mod steps;
pub mod store;

// Re-exports for convenience
pub use codec::{decode, decode_legacy_notes, encode, infer_flow_type, WorkflowRecord};
pub use engine::{
    apply_step, EngineError, OpenedPayment, SettlementEngine, StepCommand, StepError, StepOutcome,
};
pub use events::{EventLog, WorkflowEvent};
pub use models::{
    CountdownStart, FlowType, InvoiceDispatch, InvoitixDecision, LoadFacts, PaymentRecord,
    PaymentStatus, PaymentUpdate, WorkflowModel,
};
pub use policy::is_flow_edit_locked;
pub use steps::{
    bank_fee_step_state, invoitix_step_state, invoitix_steps, payout_status, valuta_step_state,
    valuta_steps, InvoitixStep, PayoutStatus, StepState, ValutaStep,
};
pub use store::{InMemoryPaymentStore, PaymentStore, StoreError};
