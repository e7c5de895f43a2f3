//! Quarantine message handling

use coinguard_bank::BankKeeper;
use coinguard_core::Context;

use crate::error::QuarantineResult;
use crate::keeper::QuarantineKeeper;
use crate::msgs::QuarantineMsg;

impl QuarantineKeeper {
    /// Validate and execute one message
    pub fn handle(
        &self,
        ctx: &mut Context<'_>,
        bank: &dyn BankKeeper,
        msg: &QuarantineMsg,
    ) -> QuarantineResult<()> {
        msg.validate_basic()?;
        match msg {
            QuarantineMsg::OptIn(m) => self.set_opt_in(ctx, &m.to_address),
            QuarantineMsg::OptOut(m) => self.set_opt_out(ctx, &m.to_address),
            QuarantineMsg::Accept(m) => self
                .accept(ctx, bank, &m.to_address, &m.from_addresses, m.permanent)
                .map(|_| ()),
            QuarantineMsg::Decline(m) => self.decline(ctx, &m.to_address, &m.from_addresses, m.permanent),
            QuarantineMsg::UpdateAutoResponses(m) => {
                self.update_auto_responses(ctx, &m.to_address, &m.updates)
            }
        }
    }
}
