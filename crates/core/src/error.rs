//! Fatal errors
//!
//! A `FatalError` means replicated state no longer matches protocol
//! assumptions. The block driver must halt instead of skipping the
//! transaction, so every node fails the same way.

use thiserror::Error;

/// Unrecoverable invariant violation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatalError {
    #[error("Corrupt store entry {key}: {reason}")]
    CorruptEntry { key: String, reason: String },

    #[error("Governance proposal {0} not found")]
    ProposalNotFound(u64),

    #[error("Invalid governance proposal status: {0}")]
    InvalidProposalStatus(String),

    #[error("Failed to encode event {kind}: {reason}")]
    EventEncoding { kind: String, reason: String },

    #[error("Invariant broken: {0}")]
    Invariant(String),
}

impl FatalError {
    /// Corrupt entry error with a hex rendering of the key
    pub fn corrupt(key: &[u8], reason: impl Into<String>) -> Self {
        FatalError::CorruptEntry {
            key: hex::encode(key),
            reason: reason.into(),
        }
    }
}
