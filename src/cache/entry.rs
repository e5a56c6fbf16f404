//! Cache Entry Module
//!
//! Defines a single cache entry with sliding (access based) expiration.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and last access time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Last read or write of this entry
    pub last_access: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, stamped as accessed now.
    pub fn new(value: V) -> Self {
        Self {
            value,
            last_access: Instant::now(),
        }
    }

    // == Touch ==
    /// Refreshes the access time, restarting the expiration window.
    pub fn touch(&mut self) {
        self.last_access = Instant::now();
    }

    // == Idle Time ==
    /// Time elapsed since the entry was last read or written.
    pub fn idle_for(&self) -> Duration {
        self.last_access.elapsed()
    }

    // == Is Expired ==
    /// Checks if the entry has been idle for at least `ttl`.
    ///
    /// Boundary condition: an entry whose idle time equals the TTL is already
    /// expired, so an entry is never served once the full window has elapsed.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.idle_for() >= ttl
    }
}
