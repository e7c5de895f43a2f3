//! Sanction genesis

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use coinguard_core::{Address, Context, FatalError};

use crate::error::{SanctionError, SanctionResult};
use crate::keeper::SanctionKeeper;
use crate::types::{Params, TemporaryEntry};

/// Sanction state at chain start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// `None` keeps the configured defaults
    #[serde(default)]
    pub params: Option<Params>,
    #[serde(default)]
    pub sanctioned_addresses: Vec<Address>,
    #[serde(default)]
    pub temporary_entries: Vec<TemporaryEntry>,
}

impl GenesisState {
    pub fn validate(&self) -> SanctionResult<()> {
        let mut seen = BTreeSet::new();
        for addr in &self.sanctioned_addresses {
            if !seen.insert(addr) {
                return Err(SanctionError::InvalidGenesis(format!(
                    "duplicate sanctioned address {addr}"
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for entry in &self.temporary_entries {
            if !seen.insert((&entry.address, entry.proposal_id)) {
                return Err(SanctionError::InvalidGenesis(format!(
                    "duplicate temporary entry {} for proposal {}",
                    entry.address, entry.proposal_id
                )));
            }
        }
        Ok(())
    }
}

pub fn init_genesis(keeper: &SanctionKeeper, ctx: &mut Context<'_>, genesis: &GenesisState) -> SanctionResult<()> {
    genesis.validate()?;
    let unsanctionable = genesis
        .sanctioned_addresses
        .iter()
        .chain(genesis.temporary_entries.iter().map(|e| &e.address))
        .find(|a| !keeper.is_sanctionable(a));
    if let Some(addr) = unsanctionable {
        return Err(SanctionError::UnsanctionableAddr(addr.clone()));
    }

    if let Some(params) = &genesis.params {
        keeper.set_params(ctx, Some(params))?;
    }
    for addr in &genesis.sanctioned_addresses {
        keeper.write_sanctioned(ctx, addr);
    }
    for entry in &genesis.temporary_entries {
        keeper.write_temp_entry(ctx, entry);
    }
    tracing::info!(
        sanctioned = genesis.sanctioned_addresses.len(),
        temporary = genesis.temporary_entries.len(),
        "Initialized sanction genesis"
    );
    Ok(())
}

/// Dump current state. Params are always exported explicitly.
pub fn export_genesis(keeper: &SanctionKeeper, ctx: &Context<'_>) -> Result<GenesisState, FatalError> {
    Ok(GenesisState {
        params: Some(keeper.get_params(ctx)),
        sanctioned_addresses: keeper.all_sanctioned_addresses(ctx)?,
        temporary_entries: keeper.all_temp_entries(ctx)?,
    })
}
