//! Quarantine invariants

use coinguard_bank::BankKeeper;
use coinguard_core::{Context, FatalError};

use crate::error::QuarantineResult;
use crate::keeper::QuarantineKeeper;

/// The holding account balance must equal the sum of all records
pub fn check_holder_balance(
    keeper: &QuarantineKeeper,
    ctx: &Context<'_>,
    bank: &dyn BankKeeper,
) -> QuarantineResult<()> {
    let expected = keeper.total_quarantined(ctx)?;
    let actual = bank.get_all_balances(ctx, keeper.holder())?;
    if actual != expected {
        tracing::error!(
            holder = %keeper.holder(),
            balance = %actual,
            quarantined = %expected,
            "Quarantine holding account out of balance"
        );
        return Err(FatalError::Invariant(format!(
            "holding account {} has [{actual}], records total [{expected}]",
            keeper.holder()
        ))
        .into());
    }
    Ok(())
}
