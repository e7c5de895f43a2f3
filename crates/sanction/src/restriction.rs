//! Sanction send restriction

use coinguard_core::{Address, Coins, Context};
use coinguard_restriction::{RestrictionError, RestrictionResult, SendRestriction};

use crate::keeper::SanctionKeeper;
use crate::keys::STORE_KEY;

/// Rejection code for a blocked sender
pub const CODE_SANCTIONED: &str = "SANCTIONED";

/// Stops transfers out of blocked accounts
#[derive(Debug, Clone)]
pub struct SanctionSendRestriction {
    keeper: SanctionKeeper,
}

impl SanctionSendRestriction {
    pub fn new(keeper: SanctionKeeper) -> Self {
        Self { keeper }
    }
}

impl SendRestriction for SanctionSendRestriction {
    fn name(&self) -> &str {
        "sanction"
    }

    fn restrict_send(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        _amount: &Coins,
    ) -> RestrictionResult<Address> {
        if ctx.has_bypass(STORE_KEY) {
            return Ok(to.clone());
        }
        if self.keeper.is_blocked(ctx, from)? {
            tracing::warn!(from = %from, to = %to, "Blocked transfer from sanctioned account");
            return Err(RestrictionError::rejected(
                format!("account {from} is sanctioned"),
                CODE_SANCTIONED,
            ));
        }
        Ok(to.clone())
    }
}
