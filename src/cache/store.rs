//! Cache Store Module
//!
//! Single-threaded cache engine combining HashMap storage with LRU tracking
//! and access-based expiration. Concurrency is layered on top by
//! [`LoadingCache`](super::LoadingCache).

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded key/value storage with LRU eviction and expire-after-access.
///
/// Because every read or write refreshes both the entry's access time and its
/// LRU position, idle entries always sit at the LRU tail. Expired entries
/// therefore form a prefix of the eviction order and can be swept without
/// scanning the whole map.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Idle time after which an entry expires
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with the given size bound and TTL.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self::with_capacity(0, max_entries, ttl)
    }

    /// Creates a new CacheStore, preallocating room for `initial_capacity`
    /// entries. The hint is clamped to `max_entries`.
    pub fn with_capacity(initial_capacity: usize, max_entries: usize, ttl: Duration) -> Self {
        let initial = initial_capacity.min(max_entries);
        Self {
            entries: HashMap::with_capacity(initial),
            lru: LruTracker::with_capacity(initial),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Get ==
    /// Retrieves a live value by key, refreshing its access time.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self.lookup(key);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    // == Peek Fresh ==
    /// Like [`get`](Self::get) but leaves the hit/miss counters alone.
    ///
    /// Used on the load path, where the miss has already been counted.
    pub fn peek_fresh(&mut self, key: &K) -> Option<V> {
        self.lookup(key)
    }

    fn lookup(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.get_mut(key)?;
        if entry.is_expired(self.ttl) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        entry.touch();
        let value = entry.value.clone();
        self.lru.touch(key);
        Some(value)
    }

    // == Insert ==
    /// Inserts or overwrites the value for `key`.
    ///
    /// A new key arriving at capacity first drops expired entries, then evicts
    /// the least recently accessed live entry.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.touch();
            self.lru.touch(&key);
            return;
        }

        self.purge_expired();
        while self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => break,
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get Or Insert ==
    /// Returns the live value for `key` if there is one, otherwise stores
    /// `value` and returns it.
    ///
    /// The load path uses this so a write that landed while the loader was
    /// running is kept rather than overwritten.
    pub fn get_or_insert(&mut self, key: K, value: V) -> V {
        match self.lookup(&key) {
            Some(live) => live,
            None => {
                self.insert(key, value.clone());
                value
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was still live.
    ///
    /// Removing a missing key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());

        if entry.is_expired(self.ttl) {
            self.stats.record_expirations(1);
            None
        } else {
            Some(entry.value)
        }
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Snapshot ==
    /// Returns the live entries from least to most recently accessed.
    ///
    /// Taking a snapshot does not count as an access.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.lru
            .iter()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .filter(|entry| !entry.is_expired(self.ttl))
                    .map(|entry| (key.clone(), entry.value.clone()))
            })
            .collect()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.purge_expired()
    }

    fn purge_expired(&mut self) -> usize {
        let mut removed = 0;

        while let Some(oldest) = self.lru.peek_oldest() {
            let expired = self
                .entries
                .get(oldest)
                .map_or(true, |entry| entry.is_expired(self.ttl));
            if !expired {
                break;
            }
            if let Some(key) = self.lru.evict_oldest() {
                self.entries.remove(&key);
                removed += 1;
            }
        }

        if removed > 0 {
            self.stats.record_expirations(removed as u64);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn record_loads(&mut self, count: u64) {
        self.stats.record_load(count);
    }

    pub(crate) fn record_load_failure(&mut self) {
        self.stats.record_load_failure();
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been swept yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
