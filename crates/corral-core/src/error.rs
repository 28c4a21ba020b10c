//! Typed errors for the mutation and import paths.
//!
//! The pipeline itself (filter/sort/group/dedup/analytics) has no error
//! path — it degrades gracefully on missing optional fields. Everything
//! that can fail is a validation or consistency problem caught before an
//! external call, always scoped to a single item or row.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrmError {
    /// A required field is missing or blank (e.g. company name, contact
    /// email). Caught before any external call.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// No record with the given id exists in the current snapshot.
    #[error("record not found: {id}")]
    NotFound { id: String },

    /// A contact operation needs a linked account, but no CRM item's
    /// contact sequence carries this contact.
    #[error("contact {contact_id} has no linked account")]
    NoLinkedAccount { contact_id: String },

    /// Text did not parse as one of the closed enum vocabularies.
    #[error("invalid {expected}: '{got}'")]
    InvalidEnum { expected: &'static str, got: String },
}

impl CrmError {
    /// Stable code identifier (`E####`) for machine parsing:
    /// `E1xxx` validation, `E2xxx` not-found/consistency.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "E1001",
            Self::InvalidEnum { .. } => "E1002",
            Self::NotFound { .. } => "E2001",
            Self::NoLinkedAccount { .. } => "E2002",
        }
    }

    /// Remediation hint surfaced to the user alongside the message.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "Fill in the required field and retry.",
            Self::InvalidEnum { .. } => "Use one of the documented values.",
            Self::NotFound { .. } => "The record may have been deleted; reload the snapshot.",
            Self::NoLinkedAccount { .. } => {
                "Attach the contact to an account before editing it."
            }
        }
    }
}
