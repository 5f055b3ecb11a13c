//! Legacy notes decoding.
//!
//! Historically, a payment's notes were one free-text field. A later
//! version embedded the structured workflow in that field as a
//! JSON payload tagged with a discriminator. Decoding pattern-matches
//! on the discriminator and falls back to treating the whole text as a
//! plain manual note; it never fails outward.

use serde::Deserialize;

use crate::models::workflow::{Text, WorkflowPatch};
use crate::models::WorkflowModel;

/// Discriminator value marking a structured notes payload.
pub const WORKFLOW_NOTES_KIND: &str = "LOAD_PAYMENT_WORKFLOW_V1";

/// Wire shape of the tagged payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaggedNotes {
    kind: String,
    manual_note: Text,
    workflow: WorkflowPatch,
}

/// What a notes field turned out to contain.
#[derive(Debug)]
pub enum NotesPayload {
    /// A tagged structured payload with the matching discriminator.
    Tagged {
        manual_note: String,
        workflow: WorkflowPatch,
    },
    /// Anything else: plain free text written by an operator.
    RawText(String),
}

impl NotesPayload {
    /// Classify a notes field. Parse failures and discriminator
    /// mismatches are not errors; they mean the text is a manual note.
    pub fn parse(text: &str) -> NotesPayload {
        match serde_json::from_str::<TaggedNotes>(text) {
            Ok(tagged) if tagged.kind == WORKFLOW_NOTES_KIND => NotesPayload::Tagged {
                manual_note: tagged.manual_note.0,
                workflow: tagged.workflow,
            },
            _ => NotesPayload::RawText(text.to_string()),
        }
    }
}

/// Result of decoding a legacy notes field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNotes {
    pub manual_note: String,
    pub model: WorkflowModel,
}

/// Decode a legacy notes field into a manual note and a workflow model.
///
/// # Example
/// ```
/// use load_settlement_core_rs::codec::decode_legacy_notes;
/// use load_settlement_core_rs::models::workflow::FlowType;
///
/// let decoded = decode_legacy_notes("call dispatcher about detention");
/// assert_eq!(decoded.manual_note, "call dispatcher about detention");
/// assert_eq!(decoded.model.flow_type, None);
///
/// let decoded = decode_legacy_notes(
///     r#"{"kind":"LOAD_PAYMENT_WORKFLOW_V1","manualNote":"x","workflow":{"flowType":"VALUTA"}}"#,
/// );
/// assert_eq!(decoded.manual_note, "x");
/// assert_eq!(decoded.model.flow_type, Some(FlowType::Valuta));
/// ```
pub fn decode_legacy_notes(text: &str) -> DecodedNotes {
    match NotesPayload::parse(text) {
        NotesPayload::Tagged {
            manual_note,
            workflow,
        } => DecodedNotes {
            manual_note,
            model: WorkflowModel::merge_defaults(&workflow),
        },
        NotesPayload::RawText(raw) => DecodedNotes {
            manual_note: raw,
            model: WorkflowModel::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_with_wrong_discriminator_is_plain_text() {
        let text = r#"{"kind":"SOMETHING_ELSE","manualNote":"x"}"#;
        let decoded = decode_legacy_notes(text);
        assert_eq!(decoded.manual_note, text);
        assert_eq!(decoded.model, WorkflowModel::default());
    }

    #[test]
    fn test_json_that_is_not_an_object_is_plain_text() {
        for text in ["[1,2,3]", "\"quoted\"", "42", "null"] {
            let decoded = decode_legacy_notes(text);
            assert_eq!(decoded.manual_note, text);
        }
    }

    #[test]
    fn test_tagged_payload_without_workflow_yields_defaults() {
        let decoded =
            decode_legacy_notes(r#"{"kind":"LOAD_PAYMENT_WORKFLOW_V1","manualNote":"hi"}"#);
        assert_eq!(decoded.manual_note, "hi");
        assert_eq!(decoded.model, WorkflowModel::default());
    }

    #[test]
    fn test_empty_text_is_an_empty_manual_note() {
        let decoded = decode_legacy_notes("");
        assert_eq!(decoded.manual_note, "");
        assert_eq!(decoded.model, WorkflowModel::default());
    }
}
