//! Paginated prefix queries

use serde::{Deserialize, Serialize};

use crate::store::KvRead;

/// Page size used when a request leaves `limit` at zero
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Page selector. `key` (relative to the iterated prefix) takes precedence over `offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub key: Option<Vec<u8>>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub count_total: bool,
}

impl PageRequest {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// Continuation data for the next page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Key to pass as `PageRequest::key` for the next page; None on the last page
    pub next_key: Option<Vec<u8>>,
    /// Total number of entries, only when `count_total` was requested without a key
    pub total: Option<u64>,
}

/// Walk the entries under `prefix` one page at a time, decoding each with `decode`.
pub fn paginate<T, E>(
    store: &dyn KvRead,
    prefix: &[u8],
    page: Option<&PageRequest>,
    mut decode: impl FnMut(&[u8], &[u8]) -> Result<T, E>,
) -> Result<(Vec<T>, PageResponse), E> {
    let page = page.cloned().unwrap_or_default();
    let limit = if page.limit == 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        page.limit
    } as usize;

    let pairs = store.prefix_iter(prefix);
    let total = pairs.len();

    let start = match &page.key {
        Some(key) => {
            let mut full = prefix.to_vec();
            full.extend_from_slice(key);
            pairs.iter().position(|(k, _)| *k >= full).unwrap_or(total)
        }
        None => (page.offset as usize).min(total),
    };
    let end = start.saturating_add(limit).min(total);

    let mut items = Vec::with_capacity(end - start);
    for (key, value) in &pairs[start..end] {
        items.push(decode(key, value)?);
    }

    let next_key = pairs.get(end).map(|(k, _)| k[prefix.len()..].to_vec());
    let total = (page.count_total && page.key.is_none()).then_some(total as u64);

    Ok((items, PageResponse { next_key, total }))
}
