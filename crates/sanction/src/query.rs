//! Sanction queries

use coinguard_core::keys::address_key;
use coinguard_core::{paginate, Address, Context, PageRequest, PageResponse};

use crate::error::SanctionResult;
use crate::keeper::{decode_temp_entry, SanctionKeeper};
use crate::keys::{parse_sanctioned_key, SANCTIONED_PREFIX, STORE_KEY, TEMP_PREFIX};
use crate::types::TemporaryEntry;

impl SanctionKeeper {
    /// Permanently sanctioned addresses, in key order
    pub fn sanctioned_addresses(
        &self,
        ctx: &Context<'_>,
        page: Option<&PageRequest>,
    ) -> SanctionResult<(Vec<Address>, PageResponse)> {
        let store = ctx.kv(STORE_KEY);
        let result = paginate(&store, &[SANCTIONED_PREFIX], page, |key, _| parse_sanctioned_key(key))?;
        Ok(result)
    }

    /// Temporary entries of one address, or of every address
    pub fn temporary_entries(
        &self,
        ctx: &Context<'_>,
        addr: Option<&Address>,
        page: Option<&PageRequest>,
    ) -> SanctionResult<(Vec<TemporaryEntry>, PageResponse)> {
        let prefix = match addr {
            Some(addr) => address_key(TEMP_PREFIX, addr),
            None => vec![TEMP_PREFIX],
        };
        let store = ctx.kv(STORE_KEY);
        let result = paginate(&store, &prefix, page, decode_temp_entry)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Params, TempStatus};
    use coinguard_core::{BlockHeader, MemStore};

    fn addr(b: u8) -> Address {
        Address::new(vec![b]).unwrap()
    }

    #[test]
    fn test_sanctioned_addresses_paginated() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let k = SanctionKeeper::new(Address::module("gov"), Vec::new(), Params::default());
        let addrs: Vec<Address> = (1..=5).map(addr).collect();
        k.sanction_addresses(&mut ctx, &addrs).unwrap();

        let (first, resp) = k
            .sanctioned_addresses(&ctx, Some(&PageRequest::with_limit(3)))
            .unwrap();
        assert_eq!(first, addrs[..3].to_vec());

        let next = PageRequest {
            key: resp.next_key,
            ..PageRequest::default()
        };
        let (rest, resp) = k.sanctioned_addresses(&ctx, Some(&next)).unwrap();
        assert_eq!(rest, addrs[3..].to_vec());
        assert!(resp.next_key.is_none());
    }

    #[test]
    fn test_temporary_entries_by_address() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(&mut store, BlockHeader::default());
        let k = SanctionKeeper::new(Address::module("gov"), Vec::new(), Params::default());
        k.add_temp_entries(&mut ctx, TempStatus::Sanctioned, 1, &[addr(1), addr(2)])
            .unwrap();
        k.add_temp_entries(&mut ctx, TempStatus::Unsanctioned, 2, &[addr(1)])
            .unwrap();

        let (one, _) = k.temporary_entries(&ctx, Some(&addr(1)), None).unwrap();
        assert_eq!(one.len(), 2);
        assert_eq!(one[1].status, TempStatus::Unsanctioned);

        let (all, _) = k.temporary_entries(&ctx, None, None).unwrap();
        assert_eq!(all.len(), 3);
    }
}
