//! Sanction messages
//!
//! All three are executed by the governance module after a proposal
//! passes; `authority` must be the governance module address.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use coinguard_core::Address;

use crate::error::{SanctionError, SanctionResult};
use crate::types::Params;

pub const MSG_SANCTION_TYPE_URL: &str = "/coinguard.sanction.v1.MsgSanction";
pub const MSG_UNSANCTION_TYPE_URL: &str = "/coinguard.sanction.v1.MsgUnsanction";
pub const MSG_UPDATE_PARAMS_TYPE_URL: &str = "/coinguard.sanction.v1.MsgUpdateParams";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSanction {
    pub addresses: Vec<Address>,
    pub authority: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUnsanction {
    pub addresses: Vec<Address>,
    pub authority: Address,
}

/// `params: None` resets the stored params to the configured defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    #[serde(default)]
    pub params: Option<Params>,
    pub authority: Address,
}

/// Any sanction message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SanctionMsg {
    Sanction(MsgSanction),
    Unsanction(MsgUnsanction),
    UpdateParams(MsgUpdateParams),
}

impl SanctionMsg {
    /// Stateless checks, run before any state is touched
    pub fn validate_basic(&self) -> SanctionResult<()> {
        match self {
            SanctionMsg::Sanction(msg) => validate_addresses(&msg.addresses),
            SanctionMsg::Unsanction(msg) => validate_addresses(&msg.addresses),
            SanctionMsg::UpdateParams(_) => Ok(()),
        }
    }

    pub fn authority(&self) -> &Address {
        match self {
            SanctionMsg::Sanction(msg) => &msg.authority,
            SanctionMsg::Unsanction(msg) => &msg.authority,
            SanctionMsg::UpdateParams(msg) => &msg.authority,
        }
    }

    pub fn type_url(&self) -> &'static str {
        match self {
            SanctionMsg::Sanction(_) => MSG_SANCTION_TYPE_URL,
            SanctionMsg::Unsanction(_) => MSG_UNSANCTION_TYPE_URL,
            SanctionMsg::UpdateParams(_) => MSG_UPDATE_PARAMS_TYPE_URL,
        }
    }
}

fn validate_addresses(addrs: &[Address]) -> SanctionResult<()> {
    if addrs.is_empty() {
        return Err(SanctionError::invalid_msg("at least one address is required"));
    }
    let mut seen = BTreeSet::new();
    for addr in addrs {
        if !seen.insert(addr) {
            return Err(SanctionError::invalid_msg(format!("duplicate address {addr}")));
        }
    }
    Ok(())
}
