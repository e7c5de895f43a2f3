//! Quarantine errors

use coinguard_bank::BankError;
use coinguard_core::{CoinError, FatalError};
use thiserror::Error;

/// Errors from quarantine operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuarantineError {
    #[error("Invalid message: {0}")]
    InvalidMsg(String),

    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("Invalid coins: {0}")]
    Coin(#[from] CoinError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Result type for quarantine operations
pub type QuarantineResult<T> = Result<T, QuarantineError>;

impl QuarantineError {
    /// Create an invalid message error
    pub fn invalid_msg(reason: impl Into<String>) -> Self {
        QuarantineError::InvalidMsg(reason.into())
    }

    pub fn is_fatal(&self) -> bool {
        match self {
            QuarantineError::Fatal(_) => true,
            QuarantineError::Bank(e) => e.is_fatal(),
            _ => false,
        }
    }
}
