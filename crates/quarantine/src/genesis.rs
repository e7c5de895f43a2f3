//! Quarantine genesis

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use coinguard_bank::BankKeeper;
use coinguard_core::{Address, Context, FatalError};

use crate::error::{QuarantineError, QuarantineResult};
use crate::invariants::check_holder_balance;
use crate::keeper::QuarantineKeeper;
use crate::types::{AutoResponse, AutoResponseEntry, QuarantineRecord, QuarantinedFunds};

/// Quarantine state at chain start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub quarantined_addresses: Vec<Address>,
    #[serde(default)]
    pub auto_responses: Vec<AutoResponseEntry>,
    #[serde(default)]
    pub quarantined_funds: Vec<QuarantinedFunds>,
}

impl GenesisState {
    pub fn validate(&self) -> QuarantineResult<()> {
        let mut pairs = BTreeSet::new();
        for entry in &self.auto_responses {
            if entry.response == AutoResponse::Unspecified {
                return Err(QuarantineError::InvalidGenesis(format!(
                    "auto-response {} -> {} is UNSPECIFIED",
                    entry.from_address, entry.to_address
                )));
            }
            if !pairs.insert((&entry.to_address, &entry.from_address)) {
                return Err(QuarantineError::InvalidGenesis(format!(
                    "duplicate auto-response {} -> {}",
                    entry.from_address, entry.to_address
                )));
            }
        }

        let mut pairs = BTreeSet::new();
        for funds in &self.quarantined_funds {
            if funds.coins.is_zero() {
                return Err(QuarantineError::InvalidGenesis(format!(
                    "quarantined funds {} -> {} hold no coins",
                    funds.from_address, funds.to_address
                )));
            }
            if !pairs.insert((&funds.to_address, &funds.from_address)) {
                return Err(QuarantineError::InvalidGenesis(format!(
                    "duplicate quarantined funds {} -> {}",
                    funds.from_address, funds.to_address
                )));
            }
        }
        Ok(())
    }
}

/// Load `genesis`. The holding account must already hold exactly the
/// quarantined total.
pub fn init_genesis(
    keeper: &QuarantineKeeper,
    ctx: &mut Context<'_>,
    bank: &dyn BankKeeper,
    genesis: &GenesisState,
) -> QuarantineResult<()> {
    genesis.validate()?;
    for addr in &genesis.quarantined_addresses {
        keeper.write_opt_in(ctx, addr);
    }
    for entry in &genesis.auto_responses {
        keeper.write_auto_response(ctx, &entry.to_address, &entry.from_address, entry.response);
    }
    for funds in &genesis.quarantined_funds {
        let record = QuarantineRecord::new(funds.coins.clone(), funds.declined);
        keeper.set_quarantine_record(ctx, &funds.to_address, &funds.from_address, &record)?;
    }
    check_holder_balance(keeper, ctx, bank)?;
    tracing::info!(
        opted_in = genesis.quarantined_addresses.len(),
        auto_responses = genesis.auto_responses.len(),
        records = genesis.quarantined_funds.len(),
        "Initialized quarantine genesis"
    );
    Ok(())
}

/// Dump current state, in key order
pub fn export_genesis(keeper: &QuarantineKeeper, ctx: &Context<'_>) -> Result<GenesisState, FatalError> {
    Ok(GenesisState {
        quarantined_addresses: keeper.opted_in_addresses(ctx)?,
        auto_responses: keeper.all_auto_responses(ctx)?,
        quarantined_funds: keeper.all_quarantined_funds(ctx)?,
    })
}
