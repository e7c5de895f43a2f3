//! Quarantine queries

use coinguard_core::{paginate, Address, Context, PageRequest, PageResponse};

use crate::error::QuarantineResult;
use crate::keeper::{decode_auto_response_entry, decode_funds, QuarantineKeeper};
use crate::keys::{auto_response_prefix, record_prefix, STORE_KEY};
use crate::types::{AutoResponseEntry, QuarantinedFunds};

impl QuarantineKeeper {
    /// Whether `to` has opted in
    pub fn is_quarantined(&self, ctx: &Context<'_>, to: &Address) -> bool {
        self.is_opted_in(ctx, to)
    }

    /// Records held for `to`, or the single (to, from) record when `from` is given
    pub fn quarantined_funds(
        &self,
        ctx: &Context<'_>,
        to: &Address,
        from: Option<&Address>,
        page: Option<&PageRequest>,
    ) -> QuarantineResult<(Vec<QuarantinedFunds>, PageResponse)> {
        if let Some(from) = from {
            let funds = self
                .get_quarantine_record(ctx, to, from)?
                .map(|record| QuarantinedFunds {
                    to_address: to.clone(),
                    from_address: from.clone(),
                    coins: record.coins,
                    declined: record.declined,
                })
                .into_iter()
                .collect();
            return Ok((funds, PageResponse::default()));
        }
        let store = ctx.kv(STORE_KEY);
        let result = paginate(&store, &record_prefix(to), page, decode_funds)?;
        Ok(result)
    }

    /// Auto-responses of `to`, or the single (to, from) response when `from` is given
    pub fn auto_responses(
        &self,
        ctx: &Context<'_>,
        to: &Address,
        from: Option<&Address>,
        page: Option<&PageRequest>,
    ) -> QuarantineResult<(Vec<AutoResponseEntry>, PageResponse)> {
        if let Some(from) = from {
            let entry = AutoResponseEntry {
                to_address: to.clone(),
                from_address: from.clone(),
                response: self.get_auto_response(ctx, to, from)?,
            };
            return Ok((vec![entry], PageResponse::default()));
        }
        let store = ctx.kv(STORE_KEY);
        let result = paginate(
            &store,
            &auto_response_prefix(to),
            page,
            decode_auto_response_entry,
        )?;
        Ok(result)
    }
}
