//! Governance interface
//!
//! The governance component owns proposal storage and tallying. This
//! module only describes what the guard modules read from it and the
//! lifecycle callbacks it fires.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

use crate::address::Address;
use crate::coin::Coins;
use crate::context::Context;
use crate::error::FatalError;

/// Proposal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    Unspecified,
    DepositPeriod,
    VotingPeriod,
    Passed,
    Rejected,
    Failed,
}

/// Type-tagged message carried inside a proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnyMsg {
    pub type_url: String,
    pub value: serde_json::Value,
}

impl AnyMsg {
    /// Wrap a serializable message under `type_url`
    pub fn pack<M: Serialize>(type_url: &str, msg: &M) -> Result<Self, serde_json::Error> {
        Ok(Self {
            type_url: type_url.to_string(),
            value: serde_json::to_value(msg)?,
        })
    }
}

/// Governance proposal as seen by hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub messages: Vec<AnyMsg>,
    pub status: ProposalStatus,
    pub total_deposit: Coins,
}

/// Read access to governance proposals
pub trait GovKeeper {
    fn get_proposal(&self, ctx: &Context<'_>, proposal_id: u64) -> Option<Proposal>;
}

/// Proposal lifecycle callbacks, invoked synchronously by the governance component.
///
/// An `Err` is fatal: the driver must stop processing the block.
pub trait GovHooks {
    fn after_proposal_submission(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError>;

    fn after_proposal_deposit(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: u64,
        depositor: &Address,
    ) -> Result<(), FatalError>;

    fn after_proposal_vote(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: u64,
        voter: &Address,
    ) -> Result<(), FatalError>;

    fn after_proposal_failed_min_deposit(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError>;

    fn after_proposal_voting_period_ended(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError>;
}

/// In-memory proposal book
#[derive(Debug, Clone, Default)]
pub struct MemGov {
    proposals: BTreeMap<u64, Proposal>,
}

impl MemGov {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, proposal: Proposal) {
        self.proposals.insert(proposal.id, proposal);
    }

    pub fn remove(&mut self, proposal_id: u64) -> Option<Proposal> {
        self.proposals.remove(&proposal_id)
    }

    pub fn set_status(&mut self, proposal_id: u64, status: ProposalStatus) {
        if let Some(p) = self.proposals.get_mut(&proposal_id) {
            p.status = status;
        }
    }

    pub fn set_total_deposit(&mut self, proposal_id: u64, deposit: Coins) {
        if let Some(p) = self.proposals.get_mut(&proposal_id) {
            p.total_deposit = deposit;
        }
    }
}

impl GovKeeper for MemGov {
    fn get_proposal(&self, _ctx: &Context<'_>, proposal_id: u64) -> Option<Proposal> {
        self.proposals.get(&proposal_id).cloned()
    }
}
