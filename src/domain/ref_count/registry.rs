//! Reference-counted registry for shared resources

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};
use tracing::{debug, warn};

use crate::domain::DomainError;

/// A shared value together with the number of live consumers holding it
#[derive(Debug, Clone)]
pub struct RefEntry<V> {
    value: V,
    ref_count: usize,
}

impl<V> RefEntry<V> {
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn ref_count(&self) -> usize {
        self.ref_count
    }

    pub fn is_idle(&self) -> bool {
        self.ref_count == 0
    }
}

/// Configuration for a ref-count registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefCountRegistryConfig {
    /// Upper bound on retained entries; `None` keeps idle entries forever
    pub max_cache_size: Option<usize>,
}

impl RefCountRegistryConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_cache_size(mut self, max_cache_size: usize) -> Self {
        self.max_cache_size = Some(max_cache_size);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match self.max_cache_size {
            Some(0) => Err(DomainError::invalid_capacity(0)),
            _ => Ok(()),
        }
    }
}

/// Registry sharing one lazily-created value per key across consumers
///
/// Entries whose count drops to zero stay cached so a quick re-acquire reuses
/// the live value. When `max_cache_size` is set, each release may evict the
/// least recently touched idle entry. Store `Arc<T>` values to hand every
/// consumer the same instance.
#[derive(Debug)]
pub struct RefCountRegistry<K, V> {
    entries: IndexMap<K, RefEntry<V>>,
    max_cache_size: Option<usize>,
}

impl<K, V> Default for RefCountRegistry<K, V>
where
    K: Hash + Eq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RefCountRegistry<K, V>
where
    K: Hash + Eq + Debug,
{
    /// Creates an unbounded registry
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            max_cache_size: None,
        }
    }

    pub fn with_config(config: RefCountRegistryConfig) -> Result<Self, DomainError> {
        config.validate()?;

        Ok(Self {
            entries: IndexMap::new(),
            max_cache_size: config.max_cache_size,
        })
    }

    /// Returns the shared value for `key`, creating it with `factory` if absent
    ///
    /// The factory runs only when the key has no entry. Every call adds one
    /// reference that must be paired with a `release`.
    pub fn acquire<F>(&mut self, key: K, factory: F) -> V
    where
        V: Clone,
        F: FnOnce() -> V,
    {
        if let Some(index) = self.entries.get_index_of(&key) {
            let last = self.promote(index);

            if let Some((key, entry)) = self.entries.get_index_mut(last) {
                entry.ref_count += 1;
                debug!(key = ?key, ref_count = entry.ref_count, "Reusing shared resource");
                return entry.value.clone();
            }
        }

        let value = factory();
        debug!(key = ?key, "Created shared resource");
        self.entries.insert(
            key,
            RefEntry {
                value: value.clone(),
                ref_count: 1,
            },
        );

        value
    }

    /// Drops one reference to `key`
    pub fn release<Q>(&mut self, key: &Q)
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.release_with(key, |_| {});
    }

    /// Drops one reference to `key`, calling `on_zero` when the last one goes
    ///
    /// Unknown keys are ignored. The entry is kept after reaching zero; it is
    /// only removed by capacity pressure or `remove`. Releasing an entry that
    /// is already at zero leaves the count at zero and logs a warning.
    pub fn release_with<Q, F>(&mut self, key: &Q, on_zero: F)
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&V),
    {
        let Some(index) = self.entries.get_index_of(key) else {
            return;
        };
        let last = self.promote(index);

        if let Some((key, entry)) = self.entries.get_index_mut(last) {
            match entry.ref_count {
                0 => {
                    warn!(key = ?key, "Release without a matching acquire; count stays at zero");
                }
                1 => {
                    entry.ref_count = 0;
                    debug!(key = ?key, "Shared resource is now idle");
                    on_zero(&entry.value);
                }
                _ => entry.ref_count -= 1,
            }
        }

        self.evict_idle();
    }

    /// Peeks at the value for `key` without touching counts or recency
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key).map(RefEntry::value)
    }

    pub fn entry<Q>(&self, key: &Q) -> Option<&RefEntry<V>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key)
    }

    pub fn ref_count<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key).map(RefEntry::ref_count)
    }

    /// Keys from least to most recently touched
    pub fn list(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Removes `key` regardless of its count
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.shift_remove(key).map(|entry| entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn promote(&mut self, index: usize) -> usize {
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        last
    }

    fn evict_idle(&mut self) {
        let Some(max_cache_size) = self.max_cache_size else {
            return;
        };

        if self.entries.len() <= max_cache_size {
            return;
        }

        let Some(index) = self.entries.values().position(RefEntry::is_idle) else {
            return;
        };

        if let Some((key, _)) = self.entries.shift_remove_index(index) {
            debug!(key = ?key, max_cache_size, "Evicted idle shared resource");
        }
    }
}
