//! Key-value store abstraction
//!
//! All module state lives behind [`KvStore`]. Iteration is always in
//! ascending byte order of the encoded keys so that every node walks
//! records identically.

use std::collections::BTreeMap;
use std::ops::Bound;

/// A key/value pair returned by iteration
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Read access to a key-value store
pub trait KvRead {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Pairs with `start <= key < end` in ascending key order.
    /// `end = None` means unbounded.
    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair>;

    /// Pairs whose key starts with `prefix`, ascending.
    fn prefix_iter(&self, prefix: &[u8]) -> Vec<KvPair> {
        let end = prefix_end(prefix);
        self.range(prefix, end.as_deref())
    }
}

/// Read/write access to a key-value store
pub trait KvStore: KvRead {
    fn set(&mut self, key: &[u8], value: Vec<u8>);

    fn delete(&mut self, key: &[u8]);
}

/// Smallest key greater than every key starting with `prefix`.
/// None when no such key exists (empty prefix or all 0xff).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

fn bounds<'k>(start: &'k [u8], end: Option<&'k [u8]>) -> (Bound<&'k [u8]>, Bound<&'k [u8]>) {
    (
        Bound::Included(start),
        end.map_or(Bound::Unbounded, Bound::Excluded),
    )
}

/// In-memory ordered store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvRead for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        if end.is_some_and(|e| e <= start) {
            return Vec::new();
        }
        self.data
            .range::<[u8], _>(bounds(start, end))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl KvStore for MemStore {
    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.data.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.data.remove(key);
    }
}

/// Pending writes of a [`CacheStore`]; `None` marks a delete.
pub type WriteSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Write overlay over a parent store.
///
/// Reads see the overlay first. Nothing reaches the parent until the
/// caller applies [`CacheStore::into_writes`] with [`apply_writes`].
pub struct CacheStore<'a> {
    parent: &'a dyn KvStore,
    writes: WriteSet,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a dyn KvStore) -> Self {
        Self {
            parent,
            writes: WriteSet::new(),
        }
    }

    pub fn into_writes(self) -> WriteSet {
        self.writes
    }
}

impl KvRead for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(pending) => pending.clone(),
            None => self.parent.get(key),
        }
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        if end.is_some_and(|e| e <= start) {
            return Vec::new();
        }
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.range(start, end).into_iter().collect();
        for (key, pending) in self.writes.range::<[u8], _>(bounds(start, end)) {
            match pending {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}

impl KvStore for CacheStore<'_> {
    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

/// Flush a write set into `store` in key order.
pub fn apply_writes(store: &mut dyn KvStore, writes: WriteSet) {
    for (key, pending) in writes {
        match pending {
            Some(value) => store.set(&key, value),
            None => store.delete(&key),
        }
    }
}

/// Read-only view of one module's namespace
pub struct PrefixView<'a> {
    parent: &'a dyn KvStore,
    prefix: Vec<u8>,
}

impl<'a> PrefixView<'a> {
    pub fn new(parent: &'a dyn KvStore, prefix: &[u8]) -> Self {
        Self {
            parent,
            prefix: prefix.to_vec(),
        }
    }
}

/// Read/write view of one module's namespace
pub struct PrefixViewMut<'a> {
    parent: &'a mut dyn KvStore,
    prefix: Vec<u8>,
}

impl<'a> PrefixViewMut<'a> {
    pub fn new(parent: &'a mut dyn KvStore, prefix: &[u8]) -> Self {
        Self {
            parent,
            prefix: prefix.to_vec(),
        }
    }
}

fn join(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut full = prefix.to_vec();
    full.extend_from_slice(key);
    full
}

fn prefixed_range(parent: &dyn KvStore, prefix: &[u8], start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
    let full_start = join(prefix, start);
    let full_end = match end {
        Some(end) => Some(join(prefix, end)),
        None => prefix_end(prefix),
    };
    parent
        .range(&full_start, full_end.as_deref())
        .into_iter()
        .map(|(k, v)| (k[prefix.len()..].to_vec(), v))
        .collect()
}

impl KvRead for PrefixView<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.parent.get(&join(&self.prefix, key))
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        prefixed_range(self.parent, &self.prefix, start, end)
    }
}

impl KvRead for PrefixViewMut<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.parent.get(&join(&self.prefix, key))
    }

    fn range(&self, start: &[u8], end: Option<&[u8]>) -> Vec<KvPair> {
        prefixed_range(&*self.parent, &self.prefix, start, end)
    }
}

impl KvStore for PrefixViewMut<'_> {
    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.parent.set(&join(&self.prefix, key), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.parent.delete(&join(&self.prefix, key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(keys: &[&[u8]]) -> MemStore {
        let mut store = MemStore::new();
        for key in keys {
            store.set(key, vec![0x01]);
        }
        store
    }

    fn keys(pairs: Vec<KvPair>) -> Vec<Vec<u8>> {
        pairs.into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_prefix_end() {
        assert_eq!(prefix_end(&[0x01, 0x02]), Some(vec![0x01, 0x03]));
        assert_eq!(prefix_end(&[0x01, 0xff]), Some(vec![0x02]));
        assert_eq!(prefix_end(&[0xff, 0xff]), None);
        assert_eq!(prefix_end(&[]), None);
    }

    #[test]
    fn test_prefix_iter_is_ordered() {
        let store = store_with(&[&[2, 1], &[1, 9], &[1, 0, 5], &[1, 0]]);
        assert_eq!(
            keys(store.prefix_iter(&[1])),
            vec![vec![1, 0], vec![1, 0, 5], vec![1, 9]]
        );
    }

    #[test]
    fn test_cache_store_overlay() {
        let mut parent = store_with(&[&[1, 1], &[1, 2]]);
        let writes = {
            let mut cache = CacheStore::new(&parent);
            cache.delete(&[1, 1]);
            cache.set(&[1, 3], vec![0x07]);
            assert!(!cache.has(&[1, 1]));
            assert_eq!(keys(cache.prefix_iter(&[1])), vec![vec![1, 2], vec![1, 3]]);
            cache.into_writes()
        };
        // parent untouched until applied
        assert!(parent.has(&[1, 1]));
        apply_writes(&mut parent, writes);
        assert!(!parent.has(&[1, 1]));
        assert_eq!(parent.get(&[1, 3]), Some(vec![0x07]));
    }

    #[test]
    fn test_prefix_views_are_isolated() {
        let mut store = MemStore::new();
        PrefixViewMut::new(&mut store, b"a/").set(&[1], vec![1]);
        PrefixViewMut::new(&mut store, b"b/").set(&[1], vec![2]);

        let a = PrefixView::new(&store, b"a/");
        assert_eq!(a.get(&[1]), Some(vec![1]));
        assert_eq!(keys(a.prefix_iter(&[])), vec![vec![1]]);
        assert_eq!(store.len(), 2);
    }
}
