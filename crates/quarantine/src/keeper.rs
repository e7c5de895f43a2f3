//! Quarantine keeper
//!
//! Funds sent to an opted-in recipient are redirected to the holding
//! account and tracked per (recipient, sender) until the recipient
//! accepts or declines them.

use coinguard_bank::{BankError, BankKeeper};
use coinguard_core::{Address, Coins, Context, FatalError, KvRead, KvStore};

use crate::error::{QuarantineError, QuarantineResult};
use crate::events::QuarantineEvent;
use crate::keys::{
    auto_response_key, opt_in_key, parse_auto_response_key, parse_opt_in_key, parse_record_key,
    record_key, AUTO_RESPONSE_PREFIX, OPT_IN_PREFIX, OPT_IN_VALUE, RECORD_PREFIX, STORE_KEY,
};
use crate::types::{AutoResponse, AutoResponseEntry, AutoResponseUpdate, QuarantineRecord, QuarantinedFunds};

/// Quarantine state access
#[derive(Debug, Clone)]
pub struct QuarantineKeeper {
    holder: Address,
}

impl QuarantineKeeper {
    /// Create a keeper escrowing into `holder`
    pub fn new(holder: Address) -> Self {
        Self { holder }
    }

    /// The holding account
    pub fn holder(&self) -> &Address {
        &self.holder
    }

    // === Opt-in ===

    pub fn is_opted_in(&self, ctx: &Context<'_>, to: &Address) -> bool {
        ctx.kv(STORE_KEY).has(&opt_in_key(to))
    }

    /// Opt `to` in. Idempotent.
    pub fn set_opt_in(&self, ctx: &mut Context<'_>, to: &Address) -> QuarantineResult<()> {
        self.write_opt_in(ctx, to);
        tracing::debug!(to = %to, "Opted in to quarantine");
        ctx.emit(&QuarantineEvent::OptIn {
            to_address: to.clone(),
        })?;
        Ok(())
    }

    /// Opt `to` out. Idempotent. Existing records stay until resolved.
    pub fn set_opt_out(&self, ctx: &mut Context<'_>, to: &Address) -> QuarantineResult<()> {
        ctx.kv_mut(STORE_KEY).delete(&opt_in_key(to));
        tracing::debug!(to = %to, "Opted out of quarantine");
        ctx.emit(&QuarantineEvent::OptOut {
            to_address: to.clone(),
        })?;
        Ok(())
    }

    pub(crate) fn write_opt_in(&self, ctx: &mut Context<'_>, to: &Address) {
        ctx.kv_mut(STORE_KEY).set(&opt_in_key(to), vec![OPT_IN_VALUE]);
    }

    // === Auto-responses ===

    pub fn get_auto_response(
        &self,
        ctx: &Context<'_>,
        to: &Address,
        from: &Address,
    ) -> Result<AutoResponse, FatalError> {
        let key = auto_response_key(to, from);
        match ctx.kv(STORE_KEY).get(&key) {
            None => Ok(AutoResponse::Unspecified),
            Some(raw) => decode_auto_response(&key, &raw),
        }
    }

    /// Set one auto-response. `Unspecified` deletes the entry.
    pub fn set_auto_response(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        from: &Address,
        response: AutoResponse,
    ) -> QuarantineResult<()> {
        self.write_auto_response(ctx, to, from, response);
        tracing::debug!(to = %to, from = %from, response = %response, "Updated auto-response");
        ctx.emit(&QuarantineEvent::AutoResponseUpdated {
            to_address: to.clone(),
            from_address: from.clone(),
            response,
        })?;
        Ok(())
    }

    pub fn update_auto_responses(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        updates: &[AutoResponseUpdate],
    ) -> QuarantineResult<()> {
        for update in updates {
            self.set_auto_response(ctx, to, &update.from_address, update.response)?;
        }
        Ok(())
    }

    pub(crate) fn write_auto_response(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        from: &Address,
        response: AutoResponse,
    ) {
        let key = auto_response_key(to, from);
        let mut store = ctx.kv_mut(STORE_KEY);
        match response.to_byte() {
            Some(byte) => store.set(&key, vec![byte]),
            None => store.delete(&key),
        }
    }

    // === Records ===

    pub fn get_quarantine_record(
        &self,
        ctx: &Context<'_>,
        to: &Address,
        from: &Address,
    ) -> Result<Option<QuarantineRecord>, FatalError> {
        let key = record_key(to, from);
        ctx.kv(STORE_KEY)
            .get(&key)
            .map(|raw| decode_record(&key, &raw))
            .transpose()
    }

    /// Store `record`, or delete the key when it holds no coins
    pub(crate) fn set_quarantine_record(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        from: &Address,
        record: &QuarantineRecord,
    ) -> Result<(), FatalError> {
        let key = record_key(to, from);
        if record.is_empty() {
            ctx.kv_mut(STORE_KEY).delete(&key);
            return Ok(());
        }
        let raw = serde_json::to_vec(record).map_err(|e| FatalError::corrupt(&key, e.to_string()))?;
        ctx.kv_mut(STORE_KEY).set(&key, raw);
        Ok(())
    }

    /// Add `coins` to the (to, from) record. The caller moves the coins
    /// into the holding account.
    pub fn add_quarantined_coins(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        from: &Address,
        coins: &Coins,
    ) -> QuarantineResult<()> {
        if coins.is_zero() {
            return Ok(());
        }
        let auto_decline = self.get_auto_response(ctx, to, from)?.is_decline();
        let mut record = self.get_quarantine_record(ctx, to, from)?.unwrap_or_default();
        record.add_coins(coins)?;
        record.declined |= auto_decline;
        self.set_quarantine_record(ctx, to, from, &record)?;

        tracing::debug!(
            to = %to,
            from = %from,
            coins = %coins,
            declined = record.declined,
            "Quarantined funds"
        );
        ctx.emit(&QuarantineEvent::FundsQuarantined {
            to_address: to.clone(),
            from_address: from.clone(),
            coins: coins.clone(),
            declined: record.declined,
        })?;
        Ok(())
    }

    /// Whether a transfer of `amount` from `from` to `to` goes into escrow.
    ///
    /// Sends to self, empty sends, recipients not opted in and senders the
    /// recipient auto-accepts pass straight through.
    pub fn should_quarantine(
        &self,
        ctx: &Context<'_>,
        to: &Address,
        from: &Address,
        amount: &Coins,
    ) -> Result<bool, FatalError> {
        if from == to || amount.is_zero() || !self.is_opted_in(ctx, to) {
            return Ok(false);
        }
        Ok(!self.get_auto_response(ctx, to, from)?.is_accept())
    }

    /// Handle funds that already sit in the holding account on behalf of `to`.
    ///
    /// The send restriction escrows new transfers itself; this entry point is
    /// for funds moved into the holding account by other means. Funds that
    /// [`should_quarantine`](Self::should_quarantine) lets through are
    /// released at once; the rest are added to the record (declined when the
    /// auto-response is DECLINE).
    pub fn record_incoming(
        &self,
        ctx: &mut Context<'_>,
        bank: &dyn BankKeeper,
        to: &Address,
        from: &Address,
        amount: &Coins,
    ) -> QuarantineResult<()> {
        if !self.should_quarantine(ctx, to, from, amount)? {
            return self.release(ctx, bank, to, from, amount);
        }
        self.add_quarantined_coins(ctx, to, from, amount)
    }

    /// Release every record of `to` from `froms`. Returns the coins released.
    pub fn accept(
        &self,
        ctx: &mut Context<'_>,
        bank: &dyn BankKeeper,
        to: &Address,
        froms: &[Address],
        permanent: bool,
    ) -> QuarantineResult<Coins> {
        let mut released = Coins::new();
        for from in froms {
            if let Some(record) = self.get_quarantine_record(ctx, to, from)? {
                ctx.kv_mut(STORE_KEY).delete(&record_key(to, from));
                self.release(ctx, bank, to, from, &record.coins)?;
                released = released.checked_add(&record.coins)?;
            }
            if permanent {
                self.set_auto_response(ctx, to, from, AutoResponse::Accept)?;
            }
        }
        Ok(released)
    }

    /// Mark every existing record of `to` from `froms` declined. Funds stay in escrow.
    pub fn decline(
        &self,
        ctx: &mut Context<'_>,
        to: &Address,
        froms: &[Address],
        permanent: bool,
    ) -> QuarantineResult<()> {
        for from in froms {
            if let Some(mut record) = self.get_quarantine_record(ctx, to, from)? {
                record.declined = true;
                self.set_quarantine_record(ctx, to, from, &record)?;
                tracing::debug!(to = %to, from = %from, coins = %record.coins, "Declined funds");
                ctx.emit(&QuarantineEvent::FundsDeclined {
                    to_address: to.clone(),
                    from_address: from.clone(),
                    coins: record.coins,
                })?;
            }
            if permanent {
                self.set_auto_response(ctx, to, from, AutoResponse::Decline)?;
            }
        }
        Ok(())
    }

    /// Move `coins` from the holding account to `to`, bypassing quarantine
    fn release(
        &self,
        ctx: &mut Context<'_>,
        bank: &dyn BankKeeper,
        to: &Address,
        from: &Address,
        coins: &Coins,
    ) -> QuarantineResult<()> {
        if coins.is_zero() {
            return Ok(());
        }
        let holder = &self.holder;
        ctx.with_bypass(STORE_KEY, |ctx| bank.send_coins(ctx, holder, to, coins))
            .map_err(|e| match e {
                BankError::InsufficientFunds { spendable, .. } => {
                    tracing::error!(
                        holder = %holder,
                        spendable = %spendable,
                        needed = %coins,
                        "Holding account cannot cover quarantined funds"
                    );
                    QuarantineError::Fatal(FatalError::Invariant(format!(
                        "holding account {holder} holds {spendable}, cannot release {coins}"
                    )))
                }
                other => other.into(),
            })?;

        tracing::debug!(to = %to, from = %from, coins = %coins, "Released quarantined funds");
        ctx.emit(&QuarantineEvent::FundsReleased {
            to_address: to.clone(),
            from_address: from.clone(),
            coins: coins.clone(),
        })?;
        Ok(())
    }

    // === Iteration ===

    /// Every opted-in address, in key order
    pub fn opted_in_addresses(&self, ctx: &Context<'_>) -> Result<Vec<Address>, FatalError> {
        ctx.kv(STORE_KEY)
            .prefix_iter(&[OPT_IN_PREFIX])
            .iter()
            .map(|(key, _)| parse_opt_in_key(key))
            .collect()
    }

    /// Every stored auto-response, in key order
    pub fn all_auto_responses(&self, ctx: &Context<'_>) -> Result<Vec<AutoResponseEntry>, FatalError> {
        ctx.kv(STORE_KEY)
            .prefix_iter(&[AUTO_RESPONSE_PREFIX])
            .iter()
            .map(|(key, raw)| decode_auto_response_entry(key, raw))
            .collect()
    }

    /// Every record, in key order
    pub fn all_quarantined_funds(&self, ctx: &Context<'_>) -> Result<Vec<QuarantinedFunds>, FatalError> {
        ctx.kv(STORE_KEY)
            .prefix_iter(&[RECORD_PREFIX])
            .iter()
            .map(|(key, raw)| decode_funds(key, raw))
            .collect()
    }

    /// Sum of every record
    pub fn total_quarantined(&self, ctx: &Context<'_>) -> Result<Coins, FatalError> {
        let mut total = Coins::new();
        for (key, raw) in ctx.kv(STORE_KEY).prefix_iter(&[RECORD_PREFIX]) {
            let record = decode_record(&key, &raw)?;
            total = total
                .checked_add(&record.coins)
                .map_err(|e| FatalError::Invariant(format!("quarantined total overflows: {e}")))?;
        }
        Ok(total)
    }
}

fn decode_auto_response(key: &[u8], raw: &[u8]) -> Result<AutoResponse, FatalError> {
    match raw {
        [byte] => AutoResponse::from_byte(*byte)
            .ok_or_else(|| FatalError::corrupt(key, format!("unknown auto-response byte {byte:#04x}"))),
        _ => Err(FatalError::corrupt(key, "auto-response must be a single byte")),
    }
}

fn decode_record(key: &[u8], raw: &[u8]) -> Result<QuarantineRecord, FatalError> {
    serde_json::from_slice(raw).map_err(|e| FatalError::corrupt(key, e.to_string()))
}

pub(crate) fn decode_auto_response_entry(key: &[u8], raw: &[u8]) -> Result<AutoResponseEntry, FatalError> {
    let (to_address, from_address) = parse_auto_response_key(key)?;
    Ok(AutoResponseEntry {
        to_address,
        from_address,
        response: decode_auto_response(key, raw)?,
    })
}

pub(crate) fn decode_funds(key: &[u8], raw: &[u8]) -> Result<QuarantinedFunds, FatalError> {
    let (to_address, from_address) = parse_record_key(key)?;
    let record = decode_record(key, raw)?;
    Ok(QuarantinedFunds {
        to_address,
        from_address,
        coins: record.coins,
        declined: record.declined,
    })
}
