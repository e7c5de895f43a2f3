//! Guard application wiring

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use coinguard_bank::{Bank, BankKeeper};
use coinguard_core::{Address, Coins, Context, FatalError, GovKeeper};
use coinguard_quarantine::{
    check_holder_balance, HolderLockedCoins, QuarantineKeeper, QuarantineMsg, QuarantineSendRestriction,
};
use coinguard_sanction::{SanctionGovHooks, SanctionKeeper, SanctionMsg, SanctionSendRestriction};

use crate::config::GuardConfig;
use crate::error::{AppError, AppResult};

/// Messages routed by [`GuardApp::deliver`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum Msg {
    Send { from: Address, to: Address, amount: Coins },
    Quarantine { msg: QuarantineMsg },
    Sanction { msg: SanctionMsg },
}

/// Genesis for both guard modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub quarantine: coinguard_quarantine::GenesisState,
    #[serde(default)]
    pub sanction: coinguard_sanction::GenesisState,
}

/// Bank plus the quarantine and sanction keepers, with restrictions
/// registered in order: sanction on the sender, then quarantine on the
/// recipient.
pub struct GuardApp {
    config: GuardConfig,
    bank: Bank,
    quarantine: QuarantineKeeper,
    sanction: SanctionKeeper,
}

impl GuardApp {
    pub fn new(config: GuardConfig) -> AppResult<Self> {
        let unsanctionable = config
            .unsanctionable_addresses()
            .map_err(|e| AppError::Config(e.to_string()))?;
        let params = config
            .sanction_params()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let quarantine = QuarantineKeeper::new(config.quarantine_holder());
        let sanction = SanctionKeeper::new(config.gov_authority(), unsanctionable, params);

        let mut bank = Bank::new();
        bank.append_send_restriction(Arc::new(SanctionSendRestriction::new(sanction.clone())));
        bank.append_send_restriction(Arc::new(QuarantineSendRestriction::new(quarantine.clone())));
        bank.append_locked_coins_lookup(Arc::new(HolderLockedCoins::new(quarantine.clone())));

        tracing::info!(
            holder = %quarantine.holder(),
            authority = %sanction.authority(),
            "Guard app ready"
        );
        Ok(Self {
            config,
            bank,
            quarantine,
            sanction,
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn quarantine(&self) -> &QuarantineKeeper {
        &self.quarantine
    }

    pub fn sanction(&self) -> &SanctionKeeper {
        &self.sanction
    }

    /// Governance hooks for proposals stored in `gov`
    pub fn gov_hooks<'a>(&'a self, gov: &'a dyn GovKeeper) -> SanctionGovHooks<'a> {
        SanctionGovHooks::new(&self.sanction, gov)
    }

    /// Clean up after governance deletes proposal `proposal_id`
    pub fn on_proposal_deleted(&self, ctx: &mut Context<'_>, gov: &dyn GovKeeper, proposal_id: u64) -> AppResult<()> {
        self.gov_hooks(gov).after_proposal_deleted(ctx, proposal_id)?;
        Ok(())
    }

    /// Execute one message. Its writes and events are kept only on success.
    pub fn deliver(&self, ctx: &mut Context<'_>, msg: &Msg) -> AppResult<()> {
        let result = ctx.atomic(|ctx| self.route(ctx, msg));
        match &result {
            Ok(()) => tracing::debug!(msg = msg.name(), "Delivered message"),
            Err(e) if e.is_fatal() => tracing::error!(msg = msg.name(), error = %e, "Fatal error delivering message"),
            Err(e) => tracing::warn!(msg = msg.name(), error = %e, "Message failed"),
        }
        result
    }

    fn route(&self, ctx: &mut Context<'_>, msg: &Msg) -> AppResult<()> {
        match msg {
            Msg::Send { from, to, amount } => Ok(self.bank.send_coins(ctx, from, to, amount)?),
            Msg::Quarantine { msg } => Ok(self.quarantine.handle(ctx, &self.bank, msg)?),
            Msg::Sanction { msg } => Ok(self.sanction.handle(ctx, msg)?),
        }
    }

    pub fn init_genesis(&self, ctx: &mut Context<'_>, genesis: &GenesisState) -> AppResult<()> {
        coinguard_sanction::init_genesis(&self.sanction, ctx, &genesis.sanction)?;
        coinguard_quarantine::init_genesis(&self.quarantine, ctx, &self.bank, &genesis.quarantine)?;
        Ok(())
    }

    pub fn export_genesis(&self, ctx: &Context<'_>) -> Result<GenesisState, FatalError> {
        Ok(GenesisState {
            quarantine: coinguard_quarantine::export_genesis(&self.quarantine, ctx)?,
            sanction: coinguard_sanction::export_genesis(&self.sanction, ctx)?,
        })
    }

    /// Run every module invariant
    pub fn check_invariants(&self, ctx: &Context<'_>) -> AppResult<()> {
        check_holder_balance(&self.quarantine, ctx, &self.bank)?;
        Ok(())
    }

    /// Balances of `addr`
    pub fn balances(&self, ctx: &Context<'_>, addr: &Address) -> AppResult<Coins> {
        Ok(self.bank.get_all_balances(ctx, addr)?)
    }
}

impl Msg {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Send { .. } => "send",
            Msg::Quarantine { msg } => match msg {
                QuarantineMsg::OptIn(_) => "quarantine/opt_in",
                QuarantineMsg::OptOut(_) => "quarantine/opt_out",
                QuarantineMsg::Accept(_) => "quarantine/accept",
                QuarantineMsg::Decline(_) => "quarantine/decline",
                QuarantineMsg::UpdateAutoResponses(_) => "quarantine/update_auto_responses",
            },
            Msg::Sanction { msg } => match msg {
                SanctionMsg::Sanction(_) => "sanction/sanction",
                SanctionMsg::Unsanction(_) => "sanction/unsanction",
                SanctionMsg::UpdateParams(_) => "sanction/update_params",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinguard_core::{BlockHeader, MemStore};

    #[test]
    fn test_bad_config_rejected() {
        let config = GuardConfig {
            default_immediate_sanction_min_deposit: "ten".to_string(),
            ..GuardConfig::default()
        };
        assert!(matches!(GuardApp::new(config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_failed_send_leaves_no_trace() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let app = GuardApp::new(GuardConfig::default()).unwrap();
        let (from, to) = (Address::new(vec![1]).unwrap(), Address::new(vec![2]).unwrap());

        let msg = Msg::Send {
            from,
            to,
            amount: "5fish".parse().unwrap(),
        };
        let err = app.deliver(&mut ctx, &msg).unwrap_err();
        assert!(matches!(err, AppError::Bank(_)));
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn test_msg_names() {
        let msg = Msg::Send {
            from: Address::new(vec![1]).unwrap(),
            to: Address::new(vec![2]).unwrap(),
            amount: Coins::new(),
        };
        assert_eq!(msg.name(), "send");
    }
}
