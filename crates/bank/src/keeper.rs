//! Store-backed balances
//!
//! Layout in the `bank` namespace:
//!
//! ```text
//! 0x00 | denom                -> total supply (amount string)
//! 0x01 | len | addr | denom   -> balance (amount string)
//! ```

use serde::Serialize;

use coinguard_core::keys::{address_key, read_address, strip_prefix};
use coinguard_core::{Address, Amount, Coin, Coins, Context, FatalError, KvRead, KvStore, TypedEvent};
use coinguard_restriction::{
    then_locked, then_mint, then_send, LockedCoinsLookupRef, MintRestrictionRef, SendRestrictionRef,
};

use crate::error::{BankError, BankResult};

/// Store namespace
pub const STORE_KEY: &str = "bank";

const SUPPLY_PREFIX: u8 = 0x00;
const BALANCE_PREFIX: u8 = 0x01;

/// Balance operations the guard modules rely on
pub trait BankKeeper {
    /// Every balance held by `addr`
    fn get_all_balances(&self, ctx: &Context<'_>, addr: &Address) -> BankResult<Coins>;

    /// Balance minus locked coins
    fn spendable_coins(&self, ctx: &Context<'_>, addr: &Address) -> BankResult<Coins>;

    /// Move coins, running the send restriction chain first
    fn send_coins(&self, ctx: &mut Context<'_>, from: &Address, to: &Address, amount: &Coins) -> BankResult<()>;
}

/// Bank events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BankEvent {
    Transfer {
        from: Address,
        to: Address,
        amount: Coins,
    },
    Mint {
        to: Address,
        amount: Coins,
    },
}

impl TypedEvent for BankEvent {
    const MODULE: &'static str = STORE_KEY;

    fn kind(&self) -> &'static str {
        match self {
            BankEvent::Transfer { .. } => "transfer",
            BankEvent::Mint { .. } => "mint",
        }
    }
}

/// Reference accounting component
#[derive(Default, Clone)]
pub struct Bank {
    send_restriction: Option<SendRestrictionRef>,
    mint_restriction: Option<MintRestrictionRef>,
    locked_coins: Option<LockedCoinsLookupRef>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `restriction` after the ones already registered
    pub fn append_send_restriction(&mut self, restriction: SendRestrictionRef) {
        self.send_restriction = then_send(self.send_restriction.take(), Some(restriction));
    }

    /// Run `restriction` before the ones already registered
    pub fn prepend_send_restriction(&mut self, restriction: SendRestrictionRef) {
        self.send_restriction = then_send(Some(restriction), self.send_restriction.take());
    }

    pub fn append_mint_restriction(&mut self, restriction: MintRestrictionRef) {
        self.mint_restriction = then_mint(self.mint_restriction.take(), Some(restriction));
    }

    pub fn append_locked_coins_lookup(&mut self, lookup: LockedCoinsLookupRef) {
        self.locked_coins = then_locked(self.locked_coins.take(), Some(lookup));
    }

    /// Coins of `addr` excluded from spending
    pub fn locked_coins(&self, ctx: &Context<'_>, addr: &Address) -> Coins {
        self.locked_coins
            .as_ref()
            .map(|lookup| lookup.locked_coins(ctx, addr))
            .unwrap_or_default()
    }

    /// Create new coins in `to`, after the mint restriction chain allows it
    pub fn mint_coins(&self, ctx: &mut Context<'_>, to: &Address, amount: &Coins) -> BankResult<()> {
        if let Some(restriction) = &self.mint_restriction {
            restriction.restrict_mint(ctx, amount)?;
        }
        for coin in amount.iter() {
            let supply = self.supply_of(ctx, &coin.denom)?;
            let supply = supply
                .checked_add(&coin.amount)
                .ok_or_else(|| coinguard_core::CoinError::Overflow(coin.denom.clone()))?;
            ctx.kv_mut(STORE_KEY)
                .set(&supply_key(&coin.denom), supply.to_string().into_bytes());
        }
        self.add_coins(ctx, to, amount)?;
        tracing::debug!(to = %to, amount = %amount, "Minted coins");
        ctx.emit(&BankEvent::Mint {
            to: to.clone(),
            amount: amount.clone(),
        })?;
        Ok(())
    }

    /// Total supply of `denom`
    pub fn supply_of(&self, ctx: &Context<'_>, denom: &str) -> BankResult<Amount> {
        let key = supply_key(denom);
        match ctx.kv(STORE_KEY).get(&key) {
            Some(raw) => Ok(decode_amount(&key, &raw)?),
            None => Ok(Amount::ZERO),
        }
    }

    /// Balance of one denom
    pub fn balance_of(&self, ctx: &Context<'_>, addr: &Address, denom: &str) -> BankResult<Amount> {
        let key = balance_key(addr, denom);
        match ctx.kv(STORE_KEY).get(&key) {
            Some(raw) => Ok(decode_amount(&key, &raw)?),
            None => Ok(Amount::ZERO),
        }
    }

    fn add_coins(&self, ctx: &mut Context<'_>, addr: &Address, amount: &Coins) -> BankResult<()> {
        for coin in amount.iter() {
            let balance = self.balance_of(ctx, addr, &coin.denom)?;
            let balance = balance
                .checked_add(&coin.amount)
                .ok_or_else(|| coinguard_core::CoinError::Overflow(coin.denom.clone()))?;
            self.set_balance(ctx, addr, &coin.denom, balance);
        }
        Ok(())
    }

    fn sub_unlocked_coins(&self, ctx: &mut Context<'_>, addr: &Address, amount: &Coins) -> BankResult<()> {
        let spendable = self.spendable_coins(ctx, addr)?;
        if !spendable.is_all_gte(amount) {
            return Err(BankError::InsufficientFunds {
                address: addr.clone(),
                spendable,
                needed: amount.clone(),
            });
        }
        for coin in amount.iter() {
            let balance = self.balance_of(ctx, addr, &coin.denom)?;
            // spendable <= balance, so this cannot underflow
            let left = balance.checked_sub(&coin.amount).unwrap_or(Amount::ZERO);
            self.set_balance(ctx, addr, &coin.denom, left);
        }
        Ok(())
    }

    fn set_balance(&self, ctx: &mut Context<'_>, addr: &Address, denom: &str, amount: Amount) {
        let key = balance_key(addr, denom);
        let mut store = ctx.kv_mut(STORE_KEY);
        if amount.is_zero() {
            store.delete(&key);
        } else {
            store.set(&key, amount.to_string().into_bytes());
        }
    }
}

impl BankKeeper for Bank {
    fn get_all_balances(&self, ctx: &Context<'_>, addr: &Address) -> BankResult<Coins> {
        let prefix = address_key(BALANCE_PREFIX, addr);
        let mut coins = Vec::new();
        for (key, raw) in ctx.kv(STORE_KEY).prefix_iter(&prefix) {
            let (_, denom) = read_address(strip_prefix(BALANCE_PREFIX, &key)?)?;
            let denom = String::from_utf8(denom.to_vec())
                .map_err(|_| FatalError::corrupt(&key, "denom is not utf-8"))?;
            coins.push(Coin {
                denom,
                amount: decode_amount(&key, &raw)?,
            });
        }
        Ok(Coins::from_coins(coins)?)
    }

    fn spendable_coins(&self, ctx: &Context<'_>, addr: &Address) -> BankResult<Coins> {
        let balance = self.get_all_balances(ctx, addr)?;
        Ok(balance.saturating_sub(&self.locked_coins(ctx, addr)))
    }

    fn send_coins(&self, ctx: &mut Context<'_>, from: &Address, to: &Address, amount: &Coins) -> BankResult<()> {
        let to = match &self.send_restriction {
            Some(restriction) => restriction.restrict_send(ctx, from, to, amount)?,
            None => to.clone(),
        };
        self.sub_unlocked_coins(ctx, from, amount)?;
        self.add_coins(ctx, &to, amount)?;
        tracing::debug!(from = %from, to = %to, amount = %amount, "Transferred coins");
        ctx.emit(&BankEvent::Transfer {
            from: from.clone(),
            to,
            amount: amount.clone(),
        })?;
        Ok(())
    }
}

fn supply_key(denom: &str) -> Vec<u8> {
    let mut key = vec![SUPPLY_PREFIX];
    key.extend_from_slice(denom.as_bytes());
    key
}

fn balance_key(addr: &Address, denom: &str) -> Vec<u8> {
    let mut key = address_key(BALANCE_PREFIX, addr);
    key.extend_from_slice(denom.as_bytes());
    key
}

fn decode_amount(key: &[u8], raw: &[u8]) -> Result<Amount, FatalError> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<Amount>().ok())
        .ok_or_else(|| FatalError::corrupt(key, "balance is not a valid amount"))
}
