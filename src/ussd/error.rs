//! Dialog-engine error taxonomy.
//!
//! Every variant here is a per-request value; nothing is process-fatal. The
//! dialog service turns traversal errors into an in-session message because
//! a closed USSD session cannot be resumed.

use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Error)]
pub enum UssdError {
    /// A variable token appeared where a menu instruction was expected.
    #[error("token '{0}' is not an instruction")]
    WrongTokenKind(String),

    /// An instruction token did not parse as a menu key.
    #[error("'{0}' is not a valid menu key")]
    BadInstruction(String),

    /// No screen is registered for this instruction at this depth.
    #[error("no action registered for '{0}'")]
    ActionNotFound(String),

    #[error("parameter '{0}' not found")]
    ParamNotFound(String),

    #[error("parameter '{key}' is not a {expected}")]
    ParamTypeMismatch { key: String, expected: &'static str },

    /// Session envelope failed validation before tokenization.
    #[error("invalid session envelope: missing '{0}'")]
    InvalidEnvelope(&'static str),

    /// A collaborator call (lookup, payment) failed during a screen.
    #[error(transparent)]
    Collaborator(#[from] DomainError),
}
