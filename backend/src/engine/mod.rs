//! Settlement engine: step commands, the pure transition chokepoint,
//! and the store-backed executor.
//!
//! See `transition.rs` for the command semantics and `executor.rs` for
//! the write-then-advance contract.

pub mod executor;
pub mod transition;

// Re-export main types for convenience
pub use executor::{EngineError, OpenedPayment, SettlementEngine};
pub use transition::{apply_step, StepCommand, StepError, StepOutcome};
