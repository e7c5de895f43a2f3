//! App errors

use coinguard_bank::BankError;
use coinguard_core::FatalError;
use coinguard_quarantine::QuarantineError;
use coinguard_sanction::SanctionError;
use thiserror::Error;

/// Errors surfaced by [`crate::GuardApp`]
///
/// `Fatal` means state is inconsistent; the block driver must halt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Bank(BankError),

    #[error(transparent)]
    Quarantine(QuarantineError),

    #[error(transparent)]
    Sanction(SanctionError),

    #[error("Fatal: {0}")]
    Fatal(FatalError),
}

/// Result type for app operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Fatal(_))
    }
}

impl From<FatalError> for AppError {
    fn from(e: FatalError) -> Self {
        AppError::Fatal(e)
    }
}

// Module errors wrapping a fatal error are lifted to `Fatal`

impl From<BankError> for AppError {
    fn from(e: BankError) -> Self {
        match e {
            BankError::Fatal(fatal) => AppError::Fatal(fatal),
            BankError::Restriction(coinguard_restriction::RestrictionError::Fatal(fatal)) => {
                AppError::Fatal(fatal)
            }
            other => AppError::Bank(other),
        }
    }
}

impl From<QuarantineError> for AppError {
    fn from(e: QuarantineError) -> Self {
        match e {
            QuarantineError::Fatal(fatal) => AppError::Fatal(fatal),
            QuarantineError::Bank(bank) => bank.into(),
            other => AppError::Quarantine(other),
        }
    }
}

impl From<SanctionError> for AppError {
    fn from(e: SanctionError) -> Self {
        match e {
            SanctionError::Fatal(fatal) => AppError::Fatal(fatal),
            other => AppError::Sanction(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_fatal_is_lifted() {
        let fatal = FatalError::ProposalNotFound(3);
        let err: AppError = QuarantineError::Bank(BankError::Fatal(fatal.clone())).into();
        assert_eq!(err, AppError::Fatal(fatal));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_policy_error_is_not_fatal() {
        let err: AppError = SanctionError::invalid_msg("empty").into();
        assert!(!err.is_fatal());
    }
}
