//! Capacity-bounded cache with least-recently-used eviction

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::domain::DomainError;

/// Callback invoked synchronously right before `set` returns with an evicted entry
pub type EvictionListener<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// Fixed-capacity key/value cache ordered by recency
///
/// Backed by a hash map threaded through a doubly linked list, so lookups,
/// promotion and eviction of the least recently used entry are all O(1).
pub struct LruCache<K, V> {
    entries: lru::LruCache<K, V>,
    on_evict: Option<EvictionListener<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
{
    /// Creates an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self, DomainError> {
        let capacity =
            NonZeroUsize::new(capacity).ok_or_else(|| DomainError::invalid_capacity(capacity))?;

        Ok(Self {
            entries: lru::LruCache::new(capacity),
            on_evict: None,
        })
    }

    /// Registers a callback receiving every entry evicted by capacity pressure
    pub fn with_eviction_listener(
        mut self,
        listener: impl FnMut(&K, &V) + Send + 'static,
    ) -> Self {
        self.on_evict = Some(Box::new(listener));
        self
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Returns the value for `key` and marks it as most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.get(key)
    }

    /// Checks for `key` without touching recency
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.contains(key)
    }

    /// Inserts or overwrites `key`, evicting the oldest entry on overflow
    pub fn set(&mut self, key: K, value: V) {
        self.push(key, value);
    }

    /// Like `set`, but hands the evicted entry (if any) back to the caller
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        // lru::LruCache::push also returns the replaced pair on overwrite
        if self.entries.contains(&key) {
            self.entries.put(key, value);
            return None;
        }

        let (key, value) = self.entries.push(key, value)?;

        if let Some(listener) = self.on_evict.as_mut() {
            listener(&key, &value);
        }

        Some((key, value))
    }

    /// Removes `key` without notifying the eviction listener
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.pop(key).is_some()
    }

    /// Drops every entry; the eviction listener is not notified
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries().map(|(key, _)| key)
    }

    /// Values from least to most recently used
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries().map(|(_, value)| value)
    }

    /// Entries from least to most recently used
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().rev()
    }
}

impl<K: Hash + Eq + fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity())
            .field("len", &self.entries.len())
            .field("has_eviction_listener", &self.on_evict.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn keys_of(cache: &LruCache<&'static str, i32>) -> Vec<&'static str> {
        cache.keys().copied().collect()
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = LruCache::<String, i32>::new(0);
        assert!(matches!(
            result,
            Err(DomainError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_evicts_oldest_entry() {
        let mut cache = LruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        assert!(!cache.has("a"));
        assert_eq!(keys_of(&cache), vec!["b", "c"]);
    }

    #[test]
    fn test_get_promotes_entry() {
        let mut cache = LruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get("a"), Some(&1));
        cache.set("c", 3);

        assert_eq!(keys_of(&cache), vec!["a", "c"]);
    }

    #[test]
    fn test_get_miss_does_not_create() {
        let mut cache: LruCache<&str, i32> = LruCache::new(2).unwrap();
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_has_does_not_promote() {
        let mut cache = LruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.has("a"));
        cache.set("c", 3);

        assert_eq!(keys_of(&cache), vec!["b", "c"]);
    }

    #[test]
    fn test_overwrite_promotes_and_replaces() {
        let mut cache = LruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        cache.set("c", 3);

        assert_eq!(keys_of(&cache), vec!["a", "c"]);
        assert_eq!(cache.get("a"), Some(&10));
    }

    #[test]
    fn test_eviction_listener_receives_evicted_entry() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let mut cache = LruCache::new(1)
            .unwrap()
            .with_eviction_listener(move |k: &&'static str, v: &i32| {
                sink.lock().unwrap().push((*k, *v));
            });

        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        assert_eq!(*evicted.lock().unwrap(), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_push_returns_evicted_entry() {
        let mut cache = LruCache::new(1).unwrap();
        assert_eq!(cache.push("a", 1), None);
        assert_eq!(cache.push("b", 2), Some(("a", 1)));
    }

    #[test]
    fn test_delete_and_clear_skip_listener() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let mut cache = LruCache::new(3)
            .unwrap()
            .with_eviction_listener(move |_: &&str, _: &i32| {
                *counter.lock().unwrap() += 1;
            });

        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_values_and_entries_follow_recency() {
        let mut cache = LruCache::new(3).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.get("a");

        assert_eq!(cache.values().copied().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(
            cache.entries().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            vec![("b", 2), ("a", 1)]
        );
    }

    #[test]
    fn test_insertion_order_eviction_sequence() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let mut cache = LruCache::new(3)
            .unwrap()
            .with_eviction_listener(move |k: &u32, _: &u32| sink.lock().unwrap().push(*k));

        for k in 1..=7u32 {
            cache.set(k, k);
        }

        assert_eq!(*evicted.lock().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![5, 6, 7]);
    }

    #[test]
    fn test_large_cache_overflow_keeps_recency_order() {
        let capacity = 50_000;
        let mut cache = LruCache::new(capacity).unwrap();

        for key in 0..capacity * 4 {
            cache.set(key, ());
        }

        assert_eq!(cache.size(), capacity);
        assert_eq!(cache.keys().next(), Some(&(capacity * 3)));

        assert!(cache.get(&(capacity * 3)).is_some());
        assert_eq!(cache.keys().last(), Some(&(capacity * 3)));
        assert_eq!(cache.keys().next(), Some(&(capacity * 3 + 1)));
    }

    proptest! {
        #[test]
        fn prop_size_never_exceeds_capacity(
            capacity in 1usize..8,
            ops in proptest::collection::vec((0u8..16, any::<bool>()), 0..64),
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            for (key, is_get) in ops {
                if is_get {
                    cache.get(&key);
                } else {
                    cache.set(key, ());
                }
                prop_assert!(cache.size() <= capacity);
            }
        }
    }
}
