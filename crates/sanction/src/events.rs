//! Sanction events

use serde::Serialize;

use coinguard_core::{Address, TypedEvent};

use crate::keys::STORE_KEY;
use crate::types::Params;

/// Events emitted by the sanction keeper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SanctionEvent {
    AddressSanctioned {
        address: Address,
    },
    AddressUnsanctioned {
        address: Address,
    },
    TempAddressSanctioned {
        address: Address,
        proposal_id: u64,
    },
    TempAddressUnsanctioned {
        address: Address,
        proposal_id: u64,
    },
    ParamsUpdated {
        params: Params,
    },
}

impl TypedEvent for SanctionEvent {
    const MODULE: &'static str = STORE_KEY;

    fn kind(&self) -> &'static str {
        match self {
            SanctionEvent::AddressSanctioned { .. } => "address_sanctioned",
            SanctionEvent::AddressUnsanctioned { .. } => "address_unsanctioned",
            SanctionEvent::TempAddressSanctioned { .. } => "temp_address_sanctioned",
            SanctionEvent::TempAddressUnsanctioned { .. } => "temp_address_unsanctioned",
            SanctionEvent::ParamsUpdated { .. } => "params_updated",
        }
    }
}
