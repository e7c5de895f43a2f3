//! Sanction keeper
//!
//! Two layers decide whether an address may send:
//!
//! - the permanent set, written only by executed governance messages
//! - temporary entries, written while a proposal is pending and keyed
//!   by proposal id; the entry with the greatest id wins
//!
//! Unsanctionable addresses are never blocked by either layer.

use std::collections::BTreeSet;

use coinguard_core::{Address, Coins, Context, FatalError, KvRead, KvStore};

use crate::error::{SanctionError, SanctionResult};
use crate::events::SanctionEvent;
use crate::keys::{
    param_key, parse_proposal_index_key, parse_sanctioned_key, parse_temp_key, proposal_index_key,
    proposal_index_prefix, sanctioned_key, temp_addr_prefix, temp_key, SANCTIONED_PREFIX,
    SANCTIONED_VALUE, STORE_KEY, TEMP_PREFIX,
};
use crate::types::{Params, TempStatus, TemporaryEntry};

pub const PARAM_IMMEDIATE_SANCTION_MIN_DEPOSIT: &str = "immediate_sanction_min_deposit";
pub const PARAM_IMMEDIATE_UNSANCTION_MIN_DEPOSIT: &str = "immediate_unsanction_min_deposit";

/// Sanction state access
#[derive(Debug, Clone)]
pub struct SanctionKeeper {
    authority: Address,
    unsanctionable: BTreeSet<Address>,
    default_params: Params,
}

impl SanctionKeeper {
    /// `authority` is the only signer allowed to change sanctions or params
    pub fn new(
        authority: Address,
        unsanctionable: impl IntoIterator<Item = Address>,
        default_params: Params,
    ) -> Self {
        Self {
            authority,
            unsanctionable: unsanctionable.into_iter().collect(),
            default_params,
        }
    }

    pub fn authority(&self) -> &Address {
        &self.authority
    }

    pub fn is_sanctionable(&self, addr: &Address) -> bool {
        !self.unsanctionable.contains(addr)
    }

    /// Permanently sanctioned and not exempt
    pub fn is_sanctioned(&self, ctx: &Context<'_>, addr: &Address) -> bool {
        self.is_sanctionable(addr) && ctx.kv(STORE_KEY).has(&sanctioned_key(addr))
    }

    /// Effective status at transfer time: the latest temporary entry
    /// overrides the permanent set.
    pub fn is_blocked(&self, ctx: &Context<'_>, addr: &Address) -> Result<bool, FatalError> {
        if !self.is_sanctionable(addr) {
            return Ok(false);
        }
        match self.latest_temp_status(ctx, addr)? {
            Some(TempStatus::Sanctioned) => Ok(true),
            Some(TempStatus::Unsanctioned) => Ok(false),
            None => Ok(ctx.kv(STORE_KEY).has(&sanctioned_key(addr))),
        }
    }

    // === Permanent set ===

    /// Add `addrs` to the permanent set and drop their temporary entries.
    /// Fails before any write if one of them is unsanctionable.
    pub fn sanction_addresses(&self, ctx: &mut Context<'_>, addrs: &[Address]) -> SanctionResult<()> {
        if let Some(addr) = addrs.iter().find(|a| !self.is_sanctionable(a)) {
            tracing::warn!(address = %addr, "Refused to sanction unsanctionable address");
            return Err(SanctionError::UnsanctionableAddr(addr.clone()));
        }
        for addr in addrs {
            ctx.kv_mut(STORE_KEY)
                .set(&sanctioned_key(addr), vec![SANCTIONED_VALUE]);
            tracing::info!(address = %addr, "Sanctioned address");
            ctx.emit(&SanctionEvent::AddressSanctioned {
                address: addr.clone(),
            })?;
        }
        self.delete_addr_temp_entries(ctx, addrs)?;
        Ok(())
    }

    /// Remove `addrs` from the permanent set and drop their temporary entries
    pub fn unsanction_addresses(&self, ctx: &mut Context<'_>, addrs: &[Address]) -> SanctionResult<()> {
        for addr in addrs {
            ctx.kv_mut(STORE_KEY).delete(&sanctioned_key(addr));
            tracing::info!(address = %addr, "Unsanctioned address");
            ctx.emit(&SanctionEvent::AddressUnsanctioned {
                address: addr.clone(),
            })?;
        }
        self.delete_addr_temp_entries(ctx, addrs)?;
        Ok(())
    }

    // === Temporary entries ===

    /// Write a `status` entry for each address under `proposal_id`,
    /// replacing only that proposal's previous entry.
    pub fn add_temp_entries(
        &self,
        ctx: &mut Context<'_>,
        status: TempStatus,
        proposal_id: u64,
        addrs: &[Address],
    ) -> SanctionResult<()> {
        if let Some(addr) = addrs.iter().find(|a| !self.is_sanctionable(a)) {
            return Err(SanctionError::UnsanctionableAddr(addr.clone()));
        }
        for addr in addrs {
            let mut store = ctx.kv_mut(STORE_KEY);
            store.set(&temp_key(addr, proposal_id), vec![status.to_byte()]);
            store.set(&proposal_index_key(proposal_id, addr), vec![status.to_byte()]);

            tracing::debug!(address = %addr, proposal_id, status = %status, "Added temporary entry");
            let event = match status {
                TempStatus::Sanctioned => SanctionEvent::TempAddressSanctioned {
                    address: addr.clone(),
                    proposal_id,
                },
                TempStatus::Unsanctioned => SanctionEvent::TempAddressUnsanctioned {
                    address: addr.clone(),
                    proposal_id,
                },
            };
            ctx.emit(&event)?;
        }
        Ok(())
    }

    /// Status of the entry with the greatest proposal id for `addr`
    pub fn latest_temp_status(&self, ctx: &Context<'_>, addr: &Address) -> Result<Option<TempStatus>, FatalError> {
        let entries = ctx.kv(STORE_KEY).prefix_iter(&temp_addr_prefix(addr));
        match entries.last() {
            Some((key, raw)) => decode_temp_status(key, raw).map(Some),
            None => Ok(None),
        }
    }

    /// Drop every temporary entry of each address, whatever the proposal
    pub fn delete_addr_temp_entries(&self, ctx: &mut Context<'_>, addrs: &[Address]) -> Result<(), FatalError> {
        for addr in addrs {
            let keys = ctx.kv(STORE_KEY).prefix_iter(&temp_addr_prefix(addr));
            for (key, _) in keys {
                let (owner, proposal_id) = parse_temp_key(&key)?;
                let mut store = ctx.kv_mut(STORE_KEY);
                store.delete(&key);
                store.delete(&proposal_index_key(proposal_id, &owner));
            }
        }
        Ok(())
    }

    /// Drop every temporary entry written for `proposal_id`
    pub fn remove_proposal_temp_entries(&self, ctx: &mut Context<'_>, proposal_id: u64) -> Result<(), FatalError> {
        let index = ctx.kv(STORE_KEY).prefix_iter(&proposal_index_prefix(proposal_id));
        let removed = index.len();
        for (key, _) in index {
            let (_, addr) = parse_proposal_index_key(&key)?;
            let mut store = ctx.kv_mut(STORE_KEY);
            store.delete(&temp_key(&addr, proposal_id));
            store.delete(&key);
        }
        if removed > 0 {
            tracing::debug!(proposal_id, removed, "Removed proposal temporary entries");
        }
        Ok(())
    }

    // === Params ===

    /// Current params; absent or unparseable values fall back to defaults
    pub fn get_params(&self, ctx: &Context<'_>) -> Params {
        Params {
            immediate_sanction_min_deposit: self.read_param(
                ctx,
                PARAM_IMMEDIATE_SANCTION_MIN_DEPOSIT,
                &self.default_params.immediate_sanction_min_deposit,
            ),
            immediate_unsanction_min_deposit: self.read_param(
                ctx,
                PARAM_IMMEDIATE_UNSANCTION_MIN_DEPOSIT,
                &self.default_params.immediate_unsanction_min_deposit,
            ),
        }
    }

    /// Store `params`, or clear them back to defaults with `None`
    pub fn set_params(&self, ctx: &mut Context<'_>, params: Option<&Params>) -> SanctionResult<()> {
        let mut store = ctx.kv_mut(STORE_KEY);
        match params {
            Some(p) => {
                store.set(
                    &param_key(PARAM_IMMEDIATE_SANCTION_MIN_DEPOSIT),
                    p.immediate_sanction_min_deposit.to_string().into_bytes(),
                );
                store.set(
                    &param_key(PARAM_IMMEDIATE_UNSANCTION_MIN_DEPOSIT),
                    p.immediate_unsanction_min_deposit.to_string().into_bytes(),
                );
            }
            None => {
                store.delete(&param_key(PARAM_IMMEDIATE_SANCTION_MIN_DEPOSIT));
                store.delete(&param_key(PARAM_IMMEDIATE_UNSANCTION_MIN_DEPOSIT));
            }
        }
        let params = self.get_params(ctx);
        tracing::info!(
            sanction_min_deposit = %params.immediate_sanction_min_deposit,
            unsanction_min_deposit = %params.immediate_unsanction_min_deposit,
            "Updated sanction params"
        );
        ctx.emit(&SanctionEvent::ParamsUpdated { params })?;
        Ok(())
    }

    fn read_param(&self, ctx: &Context<'_>, name: &str, default: &Coins) -> Coins {
        let Some(raw) = ctx.kv(STORE_KEY).get(&param_key(name)) else {
            return default.clone();
        };
        match std::str::from_utf8(&raw).ok().and_then(|s| s.parse().ok()) {
            Some(coins) => coins,
            None => {
                tracing::warn!(param = name, "Unparseable sanction param, using default");
                default.clone()
            }
        }
    }

    // === Iteration ===

    /// Every address in the permanent set, in key order
    pub fn all_sanctioned_addresses(&self, ctx: &Context<'_>) -> Result<Vec<Address>, FatalError> {
        ctx.kv(STORE_KEY)
            .prefix_iter(&[SANCTIONED_PREFIX])
            .iter()
            .map(|(key, _)| parse_sanctioned_key(key))
            .collect()
    }

    /// Every temporary entry, ordered by address then proposal id
    pub fn all_temp_entries(&self, ctx: &Context<'_>) -> Result<Vec<TemporaryEntry>, FatalError> {
        ctx.kv(STORE_KEY)
            .prefix_iter(&[TEMP_PREFIX])
            .iter()
            .map(|(key, raw)| decode_temp_entry(key, raw))
            .collect()
    }

    /// Write genesis state without events
    pub(crate) fn write_sanctioned(&self, ctx: &mut Context<'_>, addr: &Address) {
        ctx.kv_mut(STORE_KEY)
            .set(&sanctioned_key(addr), vec![SANCTIONED_VALUE]);
    }

    pub(crate) fn write_temp_entry(&self, ctx: &mut Context<'_>, entry: &TemporaryEntry) {
        let mut store = ctx.kv_mut(STORE_KEY);
        let value = vec![entry.status.to_byte()];
        store.set(&temp_key(&entry.address, entry.proposal_id), value.clone());
        store.set(&proposal_index_key(entry.proposal_id, &entry.address), value);
    }
}

fn decode_temp_status(key: &[u8], raw: &[u8]) -> Result<TempStatus, FatalError> {
    match raw {
        [byte] => TempStatus::from_byte(*byte)
            .ok_or_else(|| FatalError::corrupt(key, format!("unknown temp status byte {byte:#04x}"))),
        _ => Err(FatalError::corrupt(key, "temp status must be a single byte")),
    }
}

pub(crate) fn decode_temp_entry(key: &[u8], raw: &[u8]) -> Result<TemporaryEntry, FatalError> {
    let (address, proposal_id) = parse_temp_key(key)?;
    Ok(TemporaryEntry {
        address,
        proposal_id,
        status: decode_temp_status(key, raw)?,
    })
}
