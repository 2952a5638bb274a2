//! In-memory store backend for tests and embedding.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::RwLock;

use super::Store;
use crate::error::StoreError;

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// An ordered in-memory store. Cheaply clonable; clones and scoped views
/// share the same map. All data is lost on drop.
#[derive(Clone, Default)]
pub struct MemoryStore {
    map: Arc<RwLock<Map>>,
    prefix: Vec<u8>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys under this view's prefix.
    pub fn len(&self) -> usize {
        let (lower, upper) = self.bounds(None, None);
        self.map.read().range((lower, upper)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn abs_key(&self, key: &[u8]) -> Vec<u8> {
        let mut k = Vec::with_capacity(self.prefix.len() + key.len());
        k.extend_from_slice(&self.prefix);
        k.extend_from_slice(key);
        k
    }

    fn bounds(&self, start: Option<&[u8]>, stop: Option<&[u8]>) -> (Bound<Vec<u8>>, Bound<Vec<u8>>) {
        let lower = match start {
            Some(s) => Bound::Included(self.abs_key(s)),
            None if self.prefix.is_empty() => Bound::Unbounded,
            None => Bound::Included(self.prefix.clone()),
        };
        let upper = match stop {
            Some(s) => Bound::Excluded(self.abs_key(s)),
            None => match prefix_successor(&self.prefix) {
                Some(next) => Bound::Excluded(next),
                None => Bound::Unbounded,
            },
        };
        (lower, upper)
    }
}

impl Store for MemoryStore {
    type Range = MemoryRange;
    type KeyRange = MemoryKeyRange;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.map.write().insert(self.abs_key(key), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.read().get(&self.abs_key(key)).cloned())
    }

    fn range(
        &self,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
    ) -> Result<Self::Range, StoreError> {
        let (lower, upper) = self.bounds(start, stop);
        Ok(MemoryRange {
            map: Arc::clone(&self.map),
            lower,
            upper,
            strip: self.prefix.len(),
        })
    }

    fn range_keys(
        &self,
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
    ) -> Result<Self::KeyRange, StoreError> {
        Ok(MemoryKeyRange {
            inner: self.range(start, stop)?,
        })
    }

    fn scoped(&self, prefix: &[u8]) -> Self {
        let mut scoped = self.clone();
        scoped.prefix.extend_from_slice(prefix);
        scoped
    }
}

/// Lazy range cursor: each step re-seeks past the last yielded key, so the
/// whole range is never buffered and the shared lock is held only briefly.
pub struct MemoryRange {
    map: Arc<RwLock<Map>>,
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
    strip: usize,
}

impl Iterator for MemoryRange {
    type Item = Result<(Vec<u8>, Vec<u8>), StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map.read();
        let (key, value) = map
            .range((self.lower.clone(), self.upper.clone()))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))?;
        drop(map);
        let user_key = key[self.strip..].to_vec();
        self.lower = Bound::Excluded(key);
        Some(Ok((user_key, value)))
    }
}

/// Key-only view over [`MemoryRange`]; values stay in the map.
pub struct MemoryKeyRange {
    inner: MemoryRange,
}

impl Iterator for MemoryKeyRange {
    type Item = Result<Vec<u8>, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map(|(key, _)| key))
    }
}

/// Smallest key greater than every key starting with `prefix`, if one
/// exists.
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut next = prefix.to_vec();
    loop {
        match next.pop() {
            None => return None,
            Some(0xFF) => continue,
            Some(b) => {
                next.push(b + 1);
                return Some(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_keys(range: MemoryRange) -> Vec<Vec<u8>> {
        range.map(|r| r.unwrap().0).collect()
    }

    #[test]
    fn test_put_get() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), None);

        // Overwrite is total.
        store.put(b"a", b"2").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_range_sorted() {
        let store = MemoryStore::new();
        for key in [b"c", b"a", b"b"] {
            store.put(key, b"x").unwrap();
        }
        let keys = collect_keys(store.range(None, None).unwrap());
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_range_bounds() {
        let store = MemoryStore::new();
        for key in [b"a", b"b", b"c", b"d"] {
            store.put(key, b"x").unwrap();
        }
        let keys = collect_keys(store.range(Some(b"b"), None).unwrap());
        assert_eq!(keys, vec![b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]);

        // Stop is exclusive.
        let keys = collect_keys(store.range(Some(b"b"), Some(b"d")).unwrap());
        assert_eq!(keys, vec![b"b".to_vec(), b"c".to_vec()]);

        let keys = collect_keys(store.range(None, Some(b"a")).unwrap());
        assert!(keys.is_empty());
    }

    #[test]
    fn test_scoped_isolation() {
        let store = MemoryStore::new();
        let animals = store.scoped(b"animal-");
        let raw = store.scoped(b"raw-");

        animals.put(b"cow", b"moo").unwrap();
        raw.put(b"cow", b"beef").unwrap();

        assert_eq!(animals.get(b"cow").unwrap(), Some(b"moo".to_vec()));
        assert_eq!(raw.get(b"cow").unwrap(), Some(b"beef".to_vec()));
        assert_eq!(animals.len(), 1);

        // Scoped ranges strip the prefix and stay inside it.
        let keys = collect_keys(animals.range(None, None).unwrap());
        assert_eq!(keys, vec![b"cow".to_vec()]);

        // The root view sees both absolute keys.
        assert_eq!(store.len(), 2);
        let keys = collect_keys(store.range(None, None).unwrap());
        assert_eq!(keys, vec![b"animal-cow".to_vec(), b"raw-cow".to_vec()]);
    }

    #[test]
    fn test_nested_scoping() {
        let store = MemoryStore::new();
        let inner = store.scoped(b"a-").scoped(b"b-");
        inner.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"a-b-k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_range_keys_only() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();
        let keys: Vec<_> = store
            .range_keys(None, None)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_prefix_successor() {
        assert_eq!(prefix_successor(b"animal-"), Some(b"animal.".to_vec()));
        assert_eq!(prefix_successor(&[0x01, 0xFF]), Some(vec![0x02]));
        assert_eq!(prefix_successor(&[0xFF, 0xFF]), None);
        assert_eq!(prefix_successor(b""), None);
    }

    #[test]
    fn test_scoped_range_with_max_byte_prefix() {
        let store = MemoryStore::new();
        let edge = store.scoped(&[0xFF]);
        edge.put(b"k", b"v").unwrap();
        store.put(b"zzz", b"other").unwrap();
        let keys = collect_keys(edge.range(None, None).unwrap());
        assert_eq!(keys, vec![b"k".to_vec()]);
    }

    #[test]
    fn test_lazy_cursor_sees_later_writes() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"c", b"3").unwrap();
        let mut range = store.range(None, None).unwrap();
        assert_eq!(range.next().unwrap().unwrap().0, b"a".to_vec());
        store.put(b"b", b"2").unwrap();
        assert_eq!(range.next().unwrap().unwrap().0, b"b".to_vec());
        assert_eq!(range.next().unwrap().unwrap().0, b"c".to_vec());
        assert!(range.next().is_none());
    }
}
