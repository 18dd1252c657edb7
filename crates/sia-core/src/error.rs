use thiserror::Error;

use crate::status::LookupKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    #[error("Malformed identifier '{input}': {reason}")]
    MalformedIdentifier { input: String, reason: String },

    #[error("Transient failure looking up {kind} {identifier}")]
    TransientLookupFailure {
        kind: LookupKind,
        identifier: String,
    },

    #[error("Lookup for {kind} {identifier} failed after {attempts} attempts")]
    ExhaustedRetries {
        kind: LookupKind,
        identifier: String,
        attempts: u32,
    },

    #[error("No record matches {kind} {identifier}")]
    UnknownIdentifierPattern {
        kind: LookupKind,
        identifier: String,
    },

    #[error("Event '{event}' is not valid in stage '{stage}'")]
    InvalidTransition { stage: String, event: String },
}

impl SupportError {
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Only transient failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientLookupFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, SupportError>;
