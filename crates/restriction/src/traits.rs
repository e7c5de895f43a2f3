//! Restriction traits - one per flavor
//!
//! A restriction is a named strategy object. Plain closures can be used
//! through [`send_fn`], [`mint_fn`] and [`locked_fn`].

use std::sync::Arc;

use coinguard_core::{Address, Coins, Context};

use crate::error::RestrictionResult;

/// Runs before coins move between accounts. May rewrite the recipient.
pub trait SendRestriction: Send + Sync {
    /// Restriction name for logging
    fn name(&self) -> &str;

    /// Returns the (possibly rewritten) recipient, or an error to abort the send
    fn restrict_send(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amount: &Coins,
    ) -> RestrictionResult<Address>;
}

/// Runs before coins are minted
pub trait MintRestriction: Send + Sync {
    fn name(&self) -> &str;

    fn restrict_mint(&self, ctx: &mut Context<'_>, amount: &Coins) -> RestrictionResult<()>;
}

/// Reports coins of `addr` that must not be spent
pub trait LockedCoinsLookup: Send + Sync {
    fn name(&self) -> &str;

    fn locked_coins(&self, ctx: &Context<'_>, addr: &Address) -> Coins;
}

pub type SendRestrictionRef = Arc<dyn SendRestriction>;
pub type MintRestrictionRef = Arc<dyn MintRestriction>;
pub type LockedCoinsLookupRef = Arc<dyn LockedCoinsLookup>;

struct FnSend<F> {
    name: String,
    f: F,
}

impl<F> SendRestriction for FnSend<F>
where
    F: Fn(&mut Context<'_>, &Address, &Address, &Coins) -> RestrictionResult<Address> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn restrict_send(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amount: &Coins,
    ) -> RestrictionResult<Address> {
        (self.f)(ctx, from, to, amount)
    }
}

struct FnMint<F> {
    name: String,
    f: F,
}

impl<F> MintRestriction for FnMint<F>
where
    F: Fn(&mut Context<'_>, &Coins) -> RestrictionResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn restrict_mint(&self, ctx: &mut Context<'_>, amount: &Coins) -> RestrictionResult<()> {
        (self.f)(ctx, amount)
    }
}

struct FnLocked<F> {
    name: String,
    f: F,
}

impl<F> LockedCoinsLookup for FnLocked<F>
where
    F: Fn(&Context<'_>, &Address) -> Coins + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn locked_coins(&self, ctx: &Context<'_>, addr: &Address) -> Coins {
        (self.f)(ctx, addr)
    }
}

/// Wrap a closure as a named send restriction
pub fn send_fn<F>(name: impl Into<String>, f: F) -> SendRestrictionRef
where
    F: Fn(&mut Context<'_>, &Address, &Address, &Coins) -> RestrictionResult<Address>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnSend {
        name: name.into(),
        f,
    })
}

/// Wrap a closure as a named mint restriction
pub fn mint_fn<F>(name: impl Into<String>, f: F) -> MintRestrictionRef
where
    F: Fn(&mut Context<'_>, &Coins) -> RestrictionResult<()> + Send + Sync + 'static,
{
    Arc::new(FnMint {
        name: name.into(),
        f,
    })
}

/// Wrap a closure as a named locked-coins lookup
pub fn locked_fn<F>(name: impl Into<String>, f: F) -> LockedCoinsLookupRef
where
    F: Fn(&Context<'_>, &Address) -> Coins + Send + Sync + 'static,
{
    Arc::new(FnLocked {
        name: name.into(),
        f,
    })
}
