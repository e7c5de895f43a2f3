//! Quarantine messages
//!
//! The recipient (`to_address`) is the signer of every message.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use coinguard_core::Address;

use crate::error::{QuarantineError, QuarantineResult};
use crate::types::AutoResponseUpdate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgOptIn {
    pub to_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgOptOut {
    pub to_address: Address,
}

/// Release quarantined funds from each sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAccept {
    pub to_address: Address,
    pub from_addresses: Vec<Address>,
    #[serde(default)]
    pub permanent: bool,
}

/// Mark quarantined funds from each sender as declined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDecline {
    pub to_address: Address,
    pub from_addresses: Vec<Address>,
    #[serde(default)]
    pub permanent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAutoResponses {
    pub to_address: Address,
    pub updates: Vec<AutoResponseUpdate>,
}

/// Any quarantine message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuarantineMsg {
    OptIn(MsgOptIn),
    OptOut(MsgOptOut),
    Accept(MsgAccept),
    Decline(MsgDecline),
    UpdateAutoResponses(MsgUpdateAutoResponses),
}

impl QuarantineMsg {
    /// Stateless checks, run before any state is touched
    pub fn validate_basic(&self) -> QuarantineResult<()> {
        match self {
            QuarantineMsg::OptIn(_) | QuarantineMsg::OptOut(_) => Ok(()),
            QuarantineMsg::Accept(msg) => validate_from_addresses(&msg.from_addresses),
            QuarantineMsg::Decline(msg) => validate_from_addresses(&msg.from_addresses),
            QuarantineMsg::UpdateAutoResponses(msg) => validate_updates(&msg.updates),
        }
    }
}

fn validate_from_addresses(froms: &[Address]) -> QuarantineResult<()> {
    if froms.is_empty() {
        return Err(QuarantineError::invalid_msg("at least one from address is required"));
    }
    let mut seen = BTreeSet::new();
    for from in froms {
        if !seen.insert(from) {
            return Err(QuarantineError::invalid_msg(format!(
                "duplicate from address {from}"
            )));
        }
    }
    Ok(())
}

fn validate_updates(updates: &[AutoResponseUpdate]) -> QuarantineResult<()> {
    if updates.is_empty() {
        return Err(QuarantineError::invalid_msg("at least one update is required"));
    }
    let mut seen = BTreeSet::new();
    for update in updates {
        if !seen.insert(&update.from_address) {
            return Err(QuarantineError::invalid_msg(format!(
                "duplicate from address {}",
                update.from_address
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AutoResponse;

    fn addr(b: u8) -> Address {
        Address::new(vec![b]).unwrap()
    }

    #[test]
    fn test_accept_requires_from() {
        let msg = QuarantineMsg::Accept(MsgAccept {
            to_address: addr(1),
            from_addresses: vec![],
            permanent: false,
        });
        assert!(matches!(msg.validate_basic(), Err(QuarantineError::InvalidMsg(_))));
    }

    #[test]
    fn test_decline_rejects_duplicates() {
        let msg = QuarantineMsg::Decline(MsgDecline {
            to_address: addr(1),
            from_addresses: vec![addr(2), addr(2)],
            permanent: true,
        });
        assert!(msg.validate_basic().is_err());
    }

    #[test]
    fn test_update_allows_unspecified() {
        let msg = QuarantineMsg::UpdateAutoResponses(MsgUpdateAutoResponses {
            to_address: addr(1),
            updates: vec![
                AutoResponseUpdate {
                    from_address: addr(2),
                    response: AutoResponse::Unspecified,
                },
                AutoResponseUpdate {
                    from_address: addr(3),
                    response: AutoResponse::Accept,
                },
            ],
        });
        assert!(msg.validate_basic().is_ok());
    }

    #[test]
    fn test_update_rejects_duplicate_sender() {
        let update = AutoResponseUpdate {
            from_address: addr(2),
            response: AutoResponse::Decline,
        };
        let msg = QuarantineMsg::UpdateAutoResponses(MsgUpdateAutoResponses {
            to_address: addr(1),
            updates: vec![update.clone(), update],
        });
        assert!(msg.validate_basic().is_err());
    }

    #[test]
    fn test_msg_json_tag() {
        let msg = QuarantineMsg::OptIn(MsgOptIn { to_address: addr(9) });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "opt_in");
        assert_eq!(json["to_address"], "09");
    }
}
