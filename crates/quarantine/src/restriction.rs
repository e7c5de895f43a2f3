//! Quarantine hooks into the bank's restriction chains

use coinguard_core::{Address, Coins, Context};
use coinguard_restriction::{LockedCoinsLookup, RestrictionError, RestrictionResult, SendRestriction};

use crate::error::QuarantineError;
use crate::keeper::QuarantineKeeper;
use crate::keys::STORE_KEY;

/// Rejection code for transfers addressed to the holding account itself
pub const CODE_HOLDER_NOT_RECIPIENT: &str = "HOLDER_NOT_RECIPIENT";

/// Rejection code for a record that could not be updated
pub const CODE_QUARANTINE_FAILED: &str = "QUARANTINE_FAILED";

/// Redirects transfers into opted-in accounts to the holding account
#[derive(Debug, Clone)]
pub struct QuarantineSendRestriction {
    keeper: QuarantineKeeper,
}

impl QuarantineSendRestriction {
    pub fn new(keeper: QuarantineKeeper) -> Self {
        Self { keeper }
    }
}

impl SendRestriction for QuarantineSendRestriction {
    fn name(&self) -> &str {
        "quarantine"
    }

    fn restrict_send(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amount: &Coins,
    ) -> RestrictionResult<Address> {
        if ctx.has_bypass(STORE_KEY) {
            return Ok(to.clone());
        }
        if to == self.keeper.holder() {
            tracing::warn!(from = %from, "Refused direct transfer into the quarantine holding account");
            return Err(RestrictionError::rejected(
                format!("{to} is the quarantine holding account"),
                CODE_HOLDER_NOT_RECIPIENT,
            ));
        }
        if !self.keeper.should_quarantine(ctx, to, from, amount)? {
            return Ok(to.clone());
        }

        self.keeper
            .add_quarantined_coins(ctx, to, from, amount)
            .map_err(|e| match e {
                QuarantineError::Fatal(fatal) => RestrictionError::Fatal(fatal),
                other => RestrictionError::rejected(other.to_string(), CODE_QUARANTINE_FAILED),
            })?;
        Ok(self.keeper.holder().clone())
    }
}

/// Locks the holding account's escrow outside privileged releases
#[derive(Debug, Clone)]
pub struct HolderLockedCoins {
    keeper: QuarantineKeeper,
}

impl HolderLockedCoins {
    pub fn new(keeper: QuarantineKeeper) -> Self {
        Self { keeper }
    }
}

impl LockedCoinsLookup for HolderLockedCoins {
    fn name(&self) -> &str {
        "quarantine_holder"
    }

    fn locked_coins(&self, ctx: &Context<'_>, addr: &Address) -> Coins {
        if addr != self.keeper.holder() || ctx.has_bypass(STORE_KEY) {
            return Coins::new();
        }
        match self.keeper.total_quarantined(ctx) {
            Ok(total) => total,
            Err(e) => {
                tracing::error!(error = %e, "Cannot total quarantined funds");
                Coins::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinguard_core::{BlockHeader, MemStore};

    fn addr(b: u8) -> Address {
        Address::new(vec![b]).unwrap()
    }

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn setup() -> (QuarantineKeeper, QuarantineSendRestriction) {
        let keeper = QuarantineKeeper::new(Address::module("quarantine"));
        let restriction = QuarantineSendRestriction::new(keeper.clone());
        (keeper, restriction)
    }

    #[test]
    fn test_not_opted_in_passes_through() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (_, r) = setup();

        let to = r.restrict_send(&mut ctx, &addr(1), &addr(2), &coins("5fish")).unwrap();
        assert_eq!(to, addr(2));
    }

    #[test]
    fn test_opted_in_redirects_to_holder() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (k, r) = setup();
        k.set_opt_in(&mut ctx, &addr(2)).unwrap();

        let to = r.restrict_send(&mut ctx, &addr(1), &addr(2), &coins("5fish")).unwrap();
        assert_eq!(&to, k.holder());
        let record = k.get_quarantine_record(&ctx, &addr(2), &addr(1)).unwrap().unwrap();
        assert_eq!(record.coins, coins("5fish"));
    }

    #[test]
    fn test_auto_accept_bypasses_quarantine() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (k, r) = setup();
        k.set_opt_in(&mut ctx, &addr(2)).unwrap();
        k.set_auto_response(&mut ctx, &addr(2), &addr(1), crate::AutoResponse::Accept)
            .unwrap();

        let to = r.restrict_send(&mut ctx, &addr(1), &addr(2), &coins("5fish")).unwrap();
        assert_eq!(to, addr(2));
        assert!(k.get_quarantine_record(&ctx, &addr(2), &addr(1)).unwrap().is_none());
    }

    #[test]
    fn test_send_to_self_not_quarantined() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (k, r) = setup();
        k.set_opt_in(&mut ctx, &addr(2)).unwrap();

        let to = r.restrict_send(&mut ctx, &addr(2), &addr(2), &coins("5fish")).unwrap();
        assert_eq!(to, addr(2));
    }

    #[test]
    fn test_bypass_skips_restriction() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (k, r) = setup();
        k.set_opt_in(&mut ctx, &addr(2)).unwrap();

        let to = ctx
            .with_bypass(STORE_KEY, |ctx| r.restrict_send(ctx, &addr(1), &addr(2), &coins("5fish")))
            .unwrap();
        assert_eq!(to, addr(2));
    }

    #[test]
    fn test_direct_send_to_holder_rejected() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (k, r) = setup();

        let err = r
            .restrict_send(&mut ctx, &addr(1), &k.holder().clone(), &coins("5fish"))
            .unwrap_err();
        assert_eq!(err.code(), Some(CODE_HOLDER_NOT_RECIPIENT));
    }

    #[test]
    fn test_holder_escrow_is_locked() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let (k, _) = setup();
        let lookup = HolderLockedCoins::new(k.clone());
        k.add_quarantined_coins(&mut ctx, &addr(2), &addr(1), &coins("8fish"))
            .unwrap();

        assert_eq!(lookup.locked_coins(&ctx, k.holder()), coins("8fish"));
        assert!(lookup.locked_coins(&ctx, &addr(2)).is_zero());
        let during_release = ctx.with_bypass(STORE_KEY, |ctx| lookup.locked_coins(ctx, k.holder()));
        assert!(during_release.is_zero());
    }
}
