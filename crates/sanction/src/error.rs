//! Sanction errors

use coinguard_core::{Address, CoinError, FatalError};
use thiserror::Error;

/// Errors from sanction operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanctionError {
    #[error("Invalid message: {0}")]
    InvalidMsg(String),

    #[error("Invalid authority: expected {expected}, got {got}")]
    InvalidAuthority { expected: Address, got: Address },

    #[error("Address cannot be sanctioned: {0}")]
    UnsanctionableAddr(Address),

    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    #[error("Invalid coins: {0}")]
    Coin(#[from] CoinError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Result type for sanction operations
pub type SanctionResult<T> = Result<T, SanctionError>;

impl SanctionError {
    pub fn invalid_msg(reason: impl Into<String>) -> Self {
        SanctionError::InvalidMsg(reason.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, SanctionError::Fatal(_))
    }
}
