//! Sanction message handling

use coinguard_core::Context;

use crate::error::{SanctionError, SanctionResult};
use crate::keeper::SanctionKeeper;
use crate::msgs::SanctionMsg;

impl SanctionKeeper {
    /// Validate, check the authority, and execute one message
    pub fn handle(&self, ctx: &mut Context<'_>, msg: &SanctionMsg) -> SanctionResult<()> {
        msg.validate_basic()?;
        if msg.authority() != self.authority() {
            tracing::warn!(
                authority = %msg.authority(),
                msg = msg.type_url(),
                "Rejected sanction message from wrong authority"
            );
            return Err(SanctionError::InvalidAuthority {
                expected: self.authority().clone(),
                got: msg.authority().clone(),
            });
        }
        match msg {
            SanctionMsg::Sanction(m) => self.sanction_addresses(ctx, &m.addresses),
            SanctionMsg::Unsanction(m) => self.unsanction_addresses(ctx, &m.addresses),
            SanctionMsg::UpdateParams(m) => self.set_params(ctx, m.params.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::{MsgSanction, MsgUpdateParams};
    use crate::types::Params;
    use coinguard_core::{Address, BlockHeader, MemStore};

    fn keeper() -> SanctionKeeper {
        SanctionKeeper::new(Address::module("gov"), [Address::module("gov")], Params::default())
    }

    #[test]
    fn test_wrong_authority_rejected() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let k = keeper();
        let target = Address::new(vec![7]).unwrap();

        let msg = SanctionMsg::Sanction(MsgSanction {
            addresses: vec![target.clone()],
            authority: Address::new(vec![1]).unwrap(),
        });
        let err = k.handle(&mut ctx, &msg).unwrap_err();
        assert!(matches!(err, SanctionError::InvalidAuthority { .. }));
        assert!(!k.is_sanctioned(&ctx, &target));
    }

    #[test]
    fn test_gov_authority_sanctions() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let k = keeper();
        let target = Address::new(vec![7]).unwrap();

        let msg = SanctionMsg::Sanction(MsgSanction {
            addresses: vec![target.clone()],
            authority: Address::module("gov"),
        });
        k.handle(&mut ctx, &msg).unwrap();
        assert!(k.is_sanctioned(&ctx, &target));
        assert_eq!(ctx.events().last().unwrap().kind, "address_sanctioned");
    }

    #[test]
    fn test_update_params() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let k = keeper();
        let params = Params {
            immediate_sanction_min_deposit: "5stake".parse().unwrap(),
            immediate_unsanction_min_deposit: "7stake".parse().unwrap(),
        };

        let msg = SanctionMsg::UpdateParams(MsgUpdateParams {
            params: Some(params.clone()),
            authority: Address::module("gov"),
        });
        k.handle(&mut ctx, &msg).unwrap();
        assert_eq!(k.get_params(&ctx), params);
    }
}
