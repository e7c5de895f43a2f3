//! Restriction errors

use coinguard_core::FatalError;
use thiserror::Error;

/// Errors raised by a restriction step
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestrictionError {
    #[error("Transfer rejected: {reason} (code: {code})")]
    Rejected { reason: String, code: String },

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Result type for restriction steps
pub type RestrictionResult<T> = Result<T, RestrictionError>;

impl RestrictionError {
    /// Create a rejection error
    pub fn rejected(reason: impl Into<String>, code: impl Into<String>) -> Self {
        RestrictionError::Rejected {
            reason: reason.into(),
            code: code.into(),
        }
    }

    /// Rejection code, if this is a rejection
    pub fn code(&self) -> Option<&str> {
        match self {
            RestrictionError::Rejected { code, .. } => Some(code),
            RestrictionError::Fatal(_) => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, RestrictionError::Rejected { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, RestrictionError::Fatal(_))
    }
}
