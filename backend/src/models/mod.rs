//! Domain models for the settlement workflow engine.

pub mod load;
pub mod payment;
pub mod workflow;

// Re-exports
pub use load::LoadFacts;
pub use payment::{NewPayment, PaymentRecord, PaymentStatus, PaymentUpdate};
pub use workflow::{
    CountdownStart, FlowType, InvoiceDispatch, InvoitixDecision, InvoitixState, ValutaMode,
    ValutaState, WorkflowModel, WorkflowPatch,
};
