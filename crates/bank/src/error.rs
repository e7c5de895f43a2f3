//! Bank errors

use coinguard_core::{Address, CoinError, Coins, FatalError};
use coinguard_restriction::RestrictionError;
use thiserror::Error;

/// Errors from balance operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Insufficient funds in {address}: spendable {spendable}, needed {needed}")]
    InsufficientFunds {
        address: Address,
        spendable: Coins,
        needed: Coins,
    },

    #[error(transparent)]
    Restriction(#[from] RestrictionError),

    #[error("Invalid coins: {0}")]
    Coin(#[from] CoinError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Result type for bank operations
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    pub fn is_fatal(&self) -> bool {
        match self {
            BankError::Fatal(_) => true,
            BankError::Restriction(e) => e.is_fatal(),
            _ => false,
        }
    }
}
