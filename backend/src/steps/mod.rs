//! Step derivation engine.
//!
//! Computes, from a [`WorkflowModel`](crate::models::WorkflowModel) and
//! the load's completion state, which step of the selected settlement
//! flow is done, in progress, pending or locked, plus the
//! human-readable payout status label.
//!
//! The lifecycle of each step is a single enumerated [`StepState`]
//! derived by one function per step; no scattered boolean predicates.
//!
//! # State Rules
//!
//! - `Done` when the step's completion field is recorded
//! - `Locked` when an earlier gate is unmet
//! - `InProgress` when actionable (or, for informational steps, when
//!   currently relevant)
//! - `NotStarted` otherwise

pub mod invoitix;
pub mod status;
pub mod valuta;

// Re-export public API
pub use invoitix::{invoitix_step_state, invoitix_steps, InvoitixStep};
pub use status::{payout_status, PayoutStatus};
pub use valuta::{bank_fee_step_state, valuta_step_state, valuta_steps, ValutaStep};

/// Derived state of a single workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Not yet relevant; typically hidden until the load completes.
    NotStarted,
    /// Actionable now (or currently relevant, for informational steps).
    InProgress,
    /// The step's data is recorded.
    Done,
    /// Gated behind an earlier step that has not completed.
    Locked,
}

impl StepState {
    pub fn is_done(&self) -> bool {
        matches!(self, StepState::Done)
    }
}
