//! Read-only view of the Load collaborator entity.
//!
//! The engine never owns or mutates the load; it only needs the agreed
//! price, the delivered flag, and the legacy flow flags older records
//! carried before the structured workflow existed.

use crate::core::money::Cents;

/// The facts the settlement engine reads from a load.
///
/// # Example
/// ```
/// use load_settlement_core_rs::models::load::LoadFacts;
///
/// let load = LoadFacts::new(100_000).completed();
/// assert!(load.is_completed);
/// assert_eq!(load.base_amount, 100_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadFacts {
    /// Agreed (or published) price in cents; the principal on which
    /// fees and payouts are computed.
    pub base_amount: Cents,
    /// Delivered status; most steps are gated on completion.
    pub is_completed: bool,
    /// Legacy flag predating the structured workflow record.
    pub uses_invoitix: bool,
    /// Legacy flag predating the structured workflow record.
    pub uses_valuta: bool,
}

impl LoadFacts {
    pub fn new(base_amount: Cents) -> Self {
        Self {
            base_amount,
            ..Self::default()
        }
    }

    /// Builder: mark the load delivered.
    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    /// Builder: set the legacy invoitix flag.
    pub fn with_legacy_invoitix(mut self) -> Self {
        self.uses_invoitix = true;
        self
    }

    /// Builder: set the legacy valuta flag.
    pub fn with_legacy_valuta(mut self) -> Self {
        self.uses_valuta = true;
        self
    }
}
