//! Flow-edit lock.

use crate::models::workflow::FlowType;
use crate::models::WorkflowModel;

/// Whether the flow selection may still be changed.
///
/// Locked as soon as the active branch has recorded any step data.
/// While locked, the flow type, valuta mode and countdown-start rule
/// are frozen; only the step-specific fields may progress forward.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use load_settlement_core_rs::models::workflow::FlowType;
/// use load_settlement_core_rs::models::WorkflowModel;
/// use load_settlement_core_rs::policy::is_flow_edit_locked;
///
/// let mut model = WorkflowModel::default();
/// model.flow_type = Some(FlowType::Invoitix);
/// assert!(!is_flow_edit_locked(&model));
///
/// model.invoitix.sent_at = NaiveDate::from_ymd_opt(2024, 5, 2);
/// assert!(is_flow_edit_locked(&model));
/// ```
pub fn is_flow_edit_locked(model: &WorkflowModel) -> bool {
    match model.flow_type {
        Some(FlowType::Invoitix) => model.has_invoitix_started(),
        Some(FlowType::Valuta) => model.has_valuta_started(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unselected_flow_is_never_locked() {
        let mut model = WorkflowModel::default();
        // Stray data on an inactive branch does not lock anything.
        model.invoitix.sent_at = NaiveDate::from_ymd_opt(2024, 5, 2);
        assert!(!is_flow_edit_locked(&model));
    }

    #[test]
    fn test_inactive_branch_data_does_not_lock() {
        let mut model = WorkflowModel::default();
        model.flow_type = Some(FlowType::Valuta);
        model.invoitix.sent_at = NaiveDate::from_ymd_opt(2024, 5, 2);
        assert!(!is_flow_edit_locked(&model));
    }

    #[test]
    fn test_bank_fee_alone_locks_valuta() {
        let mut model = WorkflowModel::default();
        model.flow_type = Some(FlowType::Valuta);
        model.valuta.bank_fee_amount = "4.90".to_string();
        assert!(is_flow_edit_locked(&model));
    }
}
