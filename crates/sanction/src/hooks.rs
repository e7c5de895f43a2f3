//! Governance lifecycle hooks
//!
//! While a proposal carrying sanction or unsanction messages is pending,
//! a deposit at or above the immediate threshold puts its addresses into
//! effect temporarily. The temporary entries are removed once the
//! proposal resolves.

use coinguard_core::{Address, AnyMsg, Context, FatalError, GovHooks, GovKeeper, Proposal, ProposalStatus};

use crate::error::SanctionError;
use crate::keeper::SanctionKeeper;
use crate::msgs::{MsgSanction, MsgUnsanction, MSG_SANCTION_TYPE_URL, MSG_UNSANCTION_TYPE_URL};
use crate::types::TempStatus;

/// Hooks bound to a sanction keeper and the governance proposal store
pub struct SanctionGovHooks<'a> {
    keeper: &'a SanctionKeeper,
    gov: &'a dyn GovKeeper,
}

impl<'a> SanctionGovHooks<'a> {
    pub fn new(keeper: &'a SanctionKeeper, gov: &'a dyn GovKeeper) -> Self {
        Self { keeper, gov }
    }

    fn proposal_hook(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError> {
        let Some(proposal) = self.gov.get_proposal(ctx, proposal_id) else {
            tracing::error!(proposal_id, "Governance proposal not found in sanction hook");
            return Err(FatalError::ProposalNotFound(proposal_id));
        };

        match proposal.status {
            ProposalStatus::DepositPeriod | ProposalStatus::VotingPeriod => {
                self.apply_immediate(ctx, &proposal)
            }
            ProposalStatus::Passed => {
                for (_, addrs) in sanction_messages(&proposal)? {
                    self.keeper.delete_addr_temp_entries(ctx, &addrs)?;
                }
                tracing::info!(proposal_id, "Cleared temporary entries of passed proposal");
                Ok(())
            }
            ProposalStatus::Rejected | ProposalStatus::Failed => {
                self.keeper.remove_proposal_temp_entries(ctx, proposal_id)?;
                tracing::info!(proposal_id, status = %proposal.status, "Removed temporary entries of closed proposal");
                Ok(())
            }
            ProposalStatus::Unspecified => {
                tracing::error!(proposal_id, "Governance proposal has unspecified status");
                Err(FatalError::InvalidProposalStatus(proposal.status.to_string()))
            }
        }
    }

    /// Drop the temporary entries of a proposal removed from the governance store.
    ///
    /// The proposal is gone, so it is not looked up.
    pub fn after_proposal_deleted(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError> {
        self.keeper.remove_proposal_temp_entries(ctx, proposal_id)?;
        tracing::info!(proposal_id, "Removed temporary entries of deleted proposal");
        Ok(())
    }

    fn apply_immediate(&self, ctx: &mut Context<'_>, proposal: &Proposal) -> Result<(), FatalError> {
        let params = self.keeper.get_params(ctx);
        for (status, addrs) in sanction_messages(proposal)? {
            let min_deposit = match status {
                TempStatus::Sanctioned => &params.immediate_sanction_min_deposit,
                TempStatus::Unsanctioned => &params.immediate_unsanction_min_deposit,
            };
            if min_deposit.is_zero() || !proposal.total_deposit.is_all_gte(min_deposit) {
                continue;
            }

            let (allowed, skipped): (Vec<Address>, Vec<Address>) =
                addrs.into_iter().partition(|a| self.keeper.is_sanctionable(a));
            for addr in &skipped {
                tracing::warn!(
                    proposal_id = proposal.id,
                    address = %addr,
                    "Skipping unsanctionable address in proposal"
                );
            }
            self.keeper
                .add_temp_entries(ctx, status, proposal.id, &allowed)
                .map_err(|e| match e {
                    SanctionError::Fatal(fatal) => fatal,
                    other => FatalError::Invariant(other.to_string()),
                })?;
        }
        Ok(())
    }
}

impl GovHooks for SanctionGovHooks<'_> {
    fn after_proposal_submission(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError> {
        self.proposal_hook(ctx, proposal_id)
    }

    fn after_proposal_deposit(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: u64,
        _depositor: &Address,
    ) -> Result<(), FatalError> {
        self.proposal_hook(ctx, proposal_id)
    }

    fn after_proposal_vote(
        &self,
        _ctx: &mut Context<'_>,
        _proposal_id: u64,
        _voter: &Address,
    ) -> Result<(), FatalError> {
        Ok(())
    }

    fn after_proposal_failed_min_deposit(&self, _ctx: &mut Context<'_>, _proposal_id: u64) -> Result<(), FatalError> {
        Ok(())
    }

    fn after_proposal_voting_period_ended(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError> {
        self.proposal_hook(ctx, proposal_id)
    }
}

/// Addresses named by every sanction and unsanction message, in message order
fn sanction_messages(proposal: &Proposal) -> Result<Vec<(TempStatus, Vec<Address>)>, FatalError> {
    let mut found = Vec::new();
    for msg in &proposal.messages {
        match msg.type_url.as_str() {
            MSG_SANCTION_TYPE_URL => {
                let m: MsgSanction = decode(proposal.id, msg)?;
                found.push((TempStatus::Sanctioned, m.addresses));
            }
            MSG_UNSANCTION_TYPE_URL => {
                let m: MsgUnsanction = decode(proposal.id, msg)?;
                found.push((TempStatus::Unsanctioned, m.addresses));
            }
            _ => {}
        }
    }
    Ok(found)
}

fn decode<M: serde::de::DeserializeOwned>(proposal_id: u64, msg: &AnyMsg) -> Result<M, FatalError> {
    serde_json::from_value(msg.value.clone()).map_err(|e| FatalError::CorruptEntry {
        key: format!("proposal {proposal_id} {}", msg.type_url),
        reason: e.to_string(),
    })
}
