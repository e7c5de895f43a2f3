//! Restriction pipelines
//!
//! `compose_*` drops absent entries, returns `None` when nothing is left,
//! returns the sole survivor as-is, and otherwise builds a pipeline that
//! runs the steps in registration order:
//!
//! ```text
//! send:   to ─► step1 ─► to' ─► step2 ─► to'' ...   (first error stops)
//! mint:   step1 ─► step2 ─► ...                      (first error stops)
//! locked: step1(addr) + step2(addr) + ...            (every step runs)
//! ```

use std::sync::Arc;

use coinguard_core::{Address, Coins, Context};

use crate::error::RestrictionResult;
use crate::traits::{
    LockedCoinsLookup, LockedCoinsLookupRef, MintRestriction, MintRestrictionRef,
    SendRestriction, SendRestrictionRef,
};

fn compose_with<R: ?Sized>(
    fns: impl IntoIterator<Item = Option<Arc<R>>>,
    wrap: impl FnOnce(Vec<Arc<R>>) -> Arc<R>,
) -> Option<Arc<R>> {
    let mut present: Vec<Arc<R>> = fns.into_iter().flatten().collect();
    match present.len() {
        0 => None,
        1 => present.pop(),
        _ => Some(wrap(present)),
    }
}

/// Ordered send restrictions; threads the recipient through each step
pub struct SendPipeline {
    steps: Vec<SendRestrictionRef>,
}

impl SendRestriction for SendPipeline {
    fn name(&self) -> &str {
        "send_pipeline"
    }

    fn restrict_send(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amount: &Coins,
    ) -> RestrictionResult<Address> {
        let mut to = to.clone();
        for step in &self.steps {
            match step.restrict_send(ctx, from, &to, amount) {
                Ok(next) => {
                    if next != to {
                        tracing::debug!(
                            restriction = step.name(),
                            from = %from,
                            to = %to,
                            new_to = %next,
                            "Send restriction rewrote recipient"
                        );
                    }
                    to = next;
                }
                Err(e) => {
                    tracing::debug!(restriction = step.name(), error = %e, "Send restriction refused transfer");
                    return Err(e);
                }
            }
        }
        Ok(to)
    }
}

/// Ordered mint restrictions; first error wins
pub struct MintPipeline {
    steps: Vec<MintRestrictionRef>,
}

impl MintRestriction for MintPipeline {
    fn name(&self) -> &str {
        "mint_pipeline"
    }

    fn restrict_mint(&self, ctx: &mut Context<'_>, amount: &Coins) -> RestrictionResult<()> {
        for step in &self.steps {
            if let Err(e) = step.restrict_mint(ctx, amount) {
                tracing::debug!(restriction = step.name(), error = %e, "Mint restriction refused");
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Locked-coins lookups; results are summed
pub struct LockedCoinsPipeline {
    steps: Vec<LockedCoinsLookupRef>,
}

impl LockedCoinsLookup for LockedCoinsPipeline {
    fn name(&self) -> &str {
        "locked_coins_pipeline"
    }

    fn locked_coins(&self, ctx: &Context<'_>, addr: &Address) -> Coins {
        let mut total = Coins::new();
        for step in &self.steps {
            let locked = step.locked_coins(ctx, addr);
            match total.checked_add(&locked) {
                Ok(sum) => total = sum,
                Err(e) => {
                    tracing::error!(lookup = step.name(), address = %addr, error = %e, "Locked coins overflow");
                }
            }
        }
        total
    }
}

/// Compose send restrictions
pub fn compose_send(
    fns: impl IntoIterator<Item = Option<SendRestrictionRef>>,
) -> Option<SendRestrictionRef> {
    compose_with(fns, |steps| Arc::new(SendPipeline { steps }) as SendRestrictionRef)
}

/// Compose mint restrictions
pub fn compose_mint(
    fns: impl IntoIterator<Item = Option<MintRestrictionRef>>,
) -> Option<MintRestrictionRef> {
    compose_with(fns, |steps| Arc::new(MintPipeline { steps }) as MintRestrictionRef)
}

/// Compose locked-coins lookups
pub fn compose_locked(
    fns: impl IntoIterator<Item = Option<LockedCoinsLookupRef>>,
) -> Option<LockedCoinsLookupRef> {
    compose_with(fns, |steps| Arc::new(LockedCoinsPipeline { steps }) as LockedCoinsLookupRef)
}

/// `a` then `b`
pub fn then_send(a: Option<SendRestrictionRef>, b: Option<SendRestrictionRef>) -> Option<SendRestrictionRef> {
    compose_send([a, b])
}

/// `a` then `b`
pub fn then_mint(a: Option<MintRestrictionRef>, b: Option<MintRestrictionRef>) -> Option<MintRestrictionRef> {
    compose_mint([a, b])
}

/// `a` then `b`
pub fn then_locked(
    a: Option<LockedCoinsLookupRef>,
    b: Option<LockedCoinsLookupRef>,
) -> Option<LockedCoinsLookupRef> {
    compose_locked([a, b])
}
