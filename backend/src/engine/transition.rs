//! Step transition chokepoint.
//!
//! All workflow mutations funnel through [`apply_step`]: it validates
//! the command against the current model and the load's state, and
//! returns the advanced model together with the payment-record patch
//! and the audit event. It never mutates anything itself; on error the
//! caller's model is untouched.

use chrono::NaiveDate;
use thiserror::Error;

use crate::codec::encode;
use crate::core::dates::{add_days, parse_day_count};
use crate::core::money::parse_amount;
use crate::events::WorkflowEvent;
use crate::fees::{
    invoitix_payout, invoitix_projected_payout_date, skonto_fee, valuta_bank_fee,
    valuta_countdown_start_date, valuta_payout, valuta_projected_payout_date,
};
use crate::models::workflow::{
    CountdownStart, FlowType, InvoiceDispatch, InvoitixDecision, ValutaMode,
};
use crate::models::{LoadFacts, PaymentStatus, PaymentUpdate, WorkflowModel};
use crate::policy::is_flow_edit_locked;

/// An operator-confirmed workflow action.
#[derive(Debug, Clone, PartialEq)]
pub enum StepCommand {
    /// Choose the settlement path. One-shot once a step has data.
    SelectFlow { flow: FlowType },

    /// Configure the valuta branch (mode, countdown rule, day count,
    /// skonto percent, dispatch). One-shot once a step has data.
    ConfigureValuta {
        mode: ValutaMode,
        countdown_start: Option<CountdownStart>,
        countdown_days: String,
        skonto_percent: String,
        invoice_dispatch: Option<InvoiceDispatch>,
    },

    /// Invoice sent to the factoring provider.
    ConfirmInvoitixSent {
        sent_at: NaiveDate,
        payout_reference: String,
    },

    /// Record the provider's decision (informational).
    RecordInvoitixDecision { decision: InvoitixDecision },

    /// Send a rejected submission again.
    ResubmitInvoitix,

    /// Factoring payout landed; marks the payment paid.
    ConfirmInvoitixPayout,

    /// Invoice copy emailed to the broker (email-copy variant).
    ConfirmInvoiceEmailed { sent_at: NaiveDate },

    /// Paperwork handed to the accountant (informational).
    MarkSentToAccountant,

    /// Originals shipped (originals variant; tracking required).
    ConfirmDocumentsSent {
        shipped_at: NaiveDate,
        tracking_number: String,
    },

    /// Originals arrived at the broker (originals variant).
    ConfirmDocumentsArrived { arrived_at: NaiveDate },

    /// Broker payout landed; marks the payment paid.
    ConfirmPayoutReceived,

    /// Record the bank fee after payout; recomputes the amount.
    RecordBankFee { amount: String },
}

/// Validation failures. Reported before any state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("flow selection is locked once a step has recorded data")]
    FlowLocked,

    #[error("no settlement flow selected")]
    FlowNotSelected,

    #[error("step belongs to the {expected:?} flow")]
    WrongFlow { expected: FlowType },

    #[error("step belongs to the {expected:?} countdown rule")]
    WrongCountdownRule { expected: CountdownStart },

    #[error("load is not completed yet")]
    LoadNotCompleted,

    #[error("step already recorded")]
    AlreadyRecorded,

    #[error("previous step not completed")]
    PreviousStepIncomplete,

    #[error("tracking number is required")]
    MissingTrackingNumber,

    #[error("countdown start date is not available yet")]
    MissingCountdownStartDate,

    #[error("not a non-negative amount: {0}")]
    InvalidAmount(String),

    #[error("bank fee has already been recorded")]
    BankFeeAlreadyRecorded,

    #[error("payout has not been received yet")]
    PayoutNotReceived,
}

/// Result of a validated transition: the advanced model, the patch for
/// the external payment record, and the audit event. The patch always
/// carries the re-encoded workflow sub-record.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub model: WorkflowModel,
    pub update: PaymentUpdate,
    pub event: WorkflowEvent,
}

/// Validate and apply one step command.
///
/// Pure: takes the current model by reference, returns a new model.
/// `today` is supplied by the caller so confirmations are
/// deterministic and testable.
pub fn apply_step(
    model: &WorkflowModel,
    load: &LoadFacts,
    payment_id: &str,
    manual_note: &str,
    cmd: StepCommand,
    today: NaiveDate,
) -> Result<StepOutcome, StepError> {
    let mut next = model.clone();
    let pid = payment_id.to_string();

    let (update, event) = match cmd {
        StepCommand::SelectFlow { flow } => {
            if is_flow_edit_locked(model) {
                return Err(StepError::FlowLocked);
            }
            next.flow_type = Some(flow);
            (
                PaymentUpdate::default(),
                WorkflowEvent::FlowSelected {
                    payment_id: pid,
                    flow,
                    on: today,
                },
            )
        }

        StepCommand::ConfigureValuta {
            mode,
            countdown_start,
            countdown_days,
            skonto_percent,
            invoice_dispatch,
        } => {
            require_flow(model, FlowType::Valuta)?;
            if is_flow_edit_locked(model) {
                return Err(StepError::FlowLocked);
            }
            next.valuta.mode = mode;
            next.valuta.countdown_start = countdown_start;
            next.valuta.countdown_days = normalize_day_count(&countdown_days);
            next.valuta.skonto_percent = normalize_amount_text(&skonto_percent);
            next.valuta.invoice_dispatch = invoice_dispatch;
            (
                PaymentUpdate::default(),
                WorkflowEvent::ValutaConfigured {
                    payment_id: pid,
                    mode,
                    countdown_start,
                    on: today,
                },
            )
        }

        StepCommand::ConfirmInvoitixSent {
            sent_at,
            payout_reference,
        } => {
            require_flow(model, FlowType::Invoitix)?;
            if !load.is_completed {
                return Err(StepError::LoadNotCompleted);
            }
            if model.invoitix.sent_at.is_some() {
                return Err(StepError::AlreadyRecorded);
            }
            next.invoitix.sent_at = Some(sent_at);
            next.invoitix.payout_reference = payout_reference.trim().to_string();
            (
                PaymentUpdate::default(),
                WorkflowEvent::InvoitixSent {
                    payment_id: pid,
                    on: sent_at,
                },
            )
        }

        StepCommand::RecordInvoitixDecision { decision } => {
            require_flow(model, FlowType::Invoitix)?;
            if model.invoitix.sent_at.is_none() {
                return Err(StepError::PreviousStepIncomplete);
            }
            next.invoitix.decision = decision;
            match decision {
                InvoitixDecision::Approved => next.invoitix.approved_at = Some(today),
                InvoitixDecision::Rejected => next.invoitix.rejected_at = Some(today),
                InvoitixDecision::Pending => {}
            }
            (
                PaymentUpdate::default(),
                WorkflowEvent::InvoitixDecisionRecorded {
                    payment_id: pid,
                    decision,
                    on: today,
                },
            )
        }

        StepCommand::ResubmitInvoitix => {
            require_flow(model, FlowType::Invoitix)?;
            if model.invoitix.decision != InvoitixDecision::Rejected {
                return Err(StepError::PreviousStepIncomplete);
            }
            next.invoitix.resubmitted_at = Some(today);
            next.invoitix.decision = InvoitixDecision::Pending;
            (
                PaymentUpdate::default(),
                WorkflowEvent::InvoitixResubmitted {
                    payment_id: pid,
                    on: today,
                },
            )
        }

        StepCommand::ConfirmInvoitixPayout => {
            require_flow(model, FlowType::Invoitix)?;
            let sent_at = model.invoitix.sent_at.ok_or(StepError::PreviousStepIncomplete)?;
            if model.invoitix.payout_confirmed_at.is_some() {
                return Err(StepError::AlreadyRecorded);
            }
            next.invoitix.paid_out_at = Some(today);
            next.invoitix.payout_confirmed_at = Some(today);
            let amount = invoitix_payout(load.base_amount);
            let due_date = invoitix_projected_payout_date(Some(sent_at)).unwrap_or(today);
            (
                PaymentUpdate {
                    amount: Some(amount),
                    status: Some(PaymentStatus::Paid),
                    due_date: Some(due_date),
                    ..PaymentUpdate::default()
                },
                WorkflowEvent::InvoitixPayoutConfirmed {
                    payment_id: pid,
                    amount,
                    on: today,
                },
            )
        }

        StepCommand::ConfirmInvoiceEmailed { sent_at } => {
            require_flow(model, FlowType::Valuta)?;
            require_countdown_rule(model, CountdownStart::EmailCopyInvoice)?;
            if !load.is_completed {
                return Err(StepError::LoadNotCompleted);
            }
            if model.valuta.invoice_sent_at.is_some() {
                return Err(StepError::AlreadyRecorded);
            }
            next.valuta.invoice_sent_at = Some(sent_at);
            let due_date = parse_day_count(&model.valuta.countdown_days)
                .and_then(|days| add_days(sent_at, days));
            (
                PaymentUpdate {
                    issue_date: Some(sent_at),
                    due_date,
                    ..PaymentUpdate::default()
                },
                WorkflowEvent::InvoiceEmailed {
                    payment_id: pid,
                    on: sent_at,
                },
            )
        }

        StepCommand::MarkSentToAccountant => {
            require_flow(model, FlowType::Valuta)?;
            next.valuta.sent_to_accountant_at = Some(today);
            (
                PaymentUpdate::default(),
                WorkflowEvent::SentToAccountant {
                    payment_id: pid,
                    on: today,
                },
            )
        }

        StepCommand::ConfirmDocumentsSent {
            shipped_at,
            tracking_number,
        } => {
            require_flow(model, FlowType::Valuta)?;
            require_countdown_rule(model, CountdownStart::OriginalsReceived)?;
            if !load.is_completed {
                return Err(StepError::LoadNotCompleted);
            }
            if tracking_number.trim().is_empty() {
                return Err(StepError::MissingTrackingNumber);
            }
            if model.valuta.shipped_at.is_some() {
                return Err(StepError::AlreadyRecorded);
            }
            next.valuta.shipped_at = Some(shipped_at);
            next.valuta.tracking_number = tracking_number.trim().to_string();
            (
                PaymentUpdate {
                    issue_date: Some(shipped_at),
                    ..PaymentUpdate::default()
                },
                WorkflowEvent::DocumentsShipped {
                    payment_id: pid,
                    tracking_number: next.valuta.tracking_number.clone(),
                    on: shipped_at,
                },
            )
        }

        StepCommand::ConfirmDocumentsArrived { arrived_at } => {
            require_flow(model, FlowType::Valuta)?;
            require_countdown_rule(model, CountdownStart::OriginalsReceived)?;
            if model.valuta.shipped_at.is_none() {
                return Err(StepError::PreviousStepIncomplete);
            }
            if model.valuta.documents_arrived_at.is_some() {
                return Err(StepError::AlreadyRecorded);
            }
            next.valuta.documents_arrived_at = Some(arrived_at);
            let due_date = parse_day_count(&model.valuta.countdown_days)
                .and_then(|days| add_days(arrived_at, days));
            (
                PaymentUpdate {
                    due_date,
                    ..PaymentUpdate::default()
                },
                WorkflowEvent::DocumentsArrived {
                    payment_id: pid,
                    on: arrived_at,
                },
            )
        }

        StepCommand::ConfirmPayoutReceived => {
            require_flow(model, FlowType::Valuta)?;
            if !load.is_completed {
                return Err(StepError::LoadNotCompleted);
            }
            if model.valuta.payout_received_at.is_some() {
                return Err(StepError::AlreadyRecorded);
            }
            if valuta_countdown_start_date(&model.valuta).is_none() {
                return Err(StepError::MissingCountdownStartDate);
            }
            next.valuta.payout_received_at = Some(today);
            let skonto = skonto_fee(
                load.base_amount,
                next.valuta.mode,
                &next.valuta.skonto_percent,
            );
            let amount = valuta_payout(load.base_amount, skonto, valuta_bank_fee(&next.valuta));
            let due_date = valuta_projected_payout_date(&next.valuta).unwrap_or(today);
            (
                PaymentUpdate {
                    amount: Some(amount),
                    status: Some(PaymentStatus::Paid),
                    due_date: Some(due_date),
                    ..PaymentUpdate::default()
                },
                WorkflowEvent::PayoutReceived {
                    payment_id: pid,
                    amount,
                    on: today,
                },
            )
        }

        StepCommand::RecordBankFee { amount } => {
            require_flow(model, FlowType::Valuta)?;
            if model.valuta.payout_received_at.is_none() {
                return Err(StepError::PayoutNotReceived);
            }
            if !model.valuta.bank_fee_amount.trim().is_empty() {
                return Err(StepError::BankFeeAlreadyRecorded);
            }
            let fee = parse_amount(&amount).ok_or_else(|| StepError::InvalidAmount(amount.clone()))?;
            next.valuta.bank_fee_amount = amount.trim().to_string();
            let skonto = skonto_fee(
                load.base_amount,
                next.valuta.mode,
                &next.valuta.skonto_percent,
            );
            let new_amount = valuta_payout(load.base_amount, skonto, fee);
            (
                PaymentUpdate {
                    amount: Some(new_amount),
                    due_date: valuta_projected_payout_date(&next.valuta),
                    ..PaymentUpdate::default()
                },
                WorkflowEvent::BankFeeRecorded {
                    payment_id: pid,
                    fee,
                    amount: new_amount,
                    on: today,
                },
            )
        }
    };

    let mut update = update;
    update.workflow = Some(encode(&next, manual_note));

    Ok(StepOutcome {
        model: next,
        update,
        event,
    })
}

fn require_flow(model: &WorkflowModel, expected: FlowType) -> Result<(), StepError> {
    match model.flow_type {
        Some(flow) if flow == expected => Ok(()),
        Some(_) => Err(StepError::WrongFlow { expected }),
        None => Err(StepError::FlowNotSelected),
    }
}

fn require_countdown_rule(
    model: &WorkflowModel,
    expected: CountdownStart,
) -> Result<(), StepError> {
    if model.valuta.countdown_start == Some(expected) {
        Ok(())
    } else {
        Err(StepError::WrongCountdownRule { expected })
    }
}

fn normalize_day_count(text: &str) -> String {
    let trimmed = text.trim();
    if parse_day_count(trimmed).is_some() {
        trimmed.to_string()
    } else {
        String::new()
    }
}

fn normalize_amount_text(text: &str) -> String {
    let trimmed = text.trim();
    if parse_amount(trimmed).is_some() {
        trimmed.to_string()
    } else {
        String::new()
    }
}
