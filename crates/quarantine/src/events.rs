//! Quarantine events

use serde::Serialize;

use coinguard_core::{Address, Coins, TypedEvent};

use crate::keys::STORE_KEY;
use crate::types::AutoResponse;

/// Events emitted by the quarantine keeper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuarantineEvent {
    OptIn {
        to_address: Address,
    },
    OptOut {
        to_address: Address,
    },
    /// Coins were redirected to the holding account
    FundsQuarantined {
        to_address: Address,
        from_address: Address,
        coins: Coins,
        declined: bool,
    },
    /// Coins left the holding account for the recipient
    FundsReleased {
        to_address: Address,
        from_address: Address,
        coins: Coins,
    },
    FundsDeclined {
        to_address: Address,
        from_address: Address,
        coins: Coins,
    },
    AutoResponseUpdated {
        to_address: Address,
        from_address: Address,
        response: AutoResponse,
    },
}

impl TypedEvent for QuarantineEvent {
    const MODULE: &'static str = STORE_KEY;

    fn kind(&self) -> &'static str {
        match self {
            QuarantineEvent::OptIn { .. } => "opt_in",
            QuarantineEvent::OptOut { .. } => "opt_out",
            QuarantineEvent::FundsQuarantined { .. } => "funds_quarantined",
            QuarantineEvent::FundsReleased { .. } => "funds_released",
            QuarantineEvent::FundsDeclined { .. } => "funds_declined",
            QuarantineEvent::AutoResponseUpdated { .. } => "auto_response_updated",
        }
    }
}
