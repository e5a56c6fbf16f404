//! Cache Builder Module
//!
//! Fluent configuration for [`LoadingCache`].

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheLoader, CacheStore, LoadingCache};
use crate::error::{CacheError, Result};

// == Defaults ==
/// Entries preallocated when no hint is given
pub const DEFAULT_INITIAL_CAPACITY: usize = 100;

/// Size bound when none is given
pub const DEFAULT_MAXIMUM_SIZE: usize = 10_000;

/// Idle window when none is given (30 minutes)
pub const DEFAULT_EXPIRE_AFTER_ACCESS: Duration = Duration::from_secs(30 * 60);

// == Cache Builder ==
/// Builder for a [`LoadingCache`].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use user_cache::cache::{CacheBuilder, LoadingCache};
/// use user_cache::error::Result;
///
/// let cache: LoadingCache<u64, String> = CacheBuilder::new()
///     .initial_capacity(100)
///     .maximum_size(10_000)
///     .expire_after_access(Duration::from_secs(30 * 60))
///     .build(|key: &u64| -> Result<String> { Ok(format!("user-{key}")) })
///     .unwrap();
/// # drop(cache);
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    initial_capacity: usize,
    maximum_size: usize,
    expire_after_access: Duration,
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            maximum_size: DEFAULT_MAXIMUM_SIZE,
            expire_after_access: DEFAULT_EXPIRE_AFTER_ACCESS,
        }
    }
}

impl CacheBuilder {
    /// Creates a builder with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocation hint. Has no effect on behavior.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Hard upper bound on the number of entries. Must be positive.
    #[must_use]
    pub fn maximum_size(mut self, size: usize) -> Self {
        self.maximum_size = size;
        self
    }

    /// Idle time after which an entry expires. Reads and writes both restart
    /// the window. Must be positive.
    #[must_use]
    pub fn expire_after_access(mut self, ttl: Duration) -> Self {
        self.expire_after_access = ttl;
        self
    }

    // == Build ==
    /// Validates the settings and creates an empty cache backed by `loader`.
    pub fn build<K, V, L>(self, loader: L) -> Result<LoadingCache<K, V>>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        L: CacheLoader<K, V> + 'static,
    {
        if self.maximum_size == 0 {
            return Err(CacheError::InvalidConfig(
                "maximum size must be greater than zero".to_string(),
            ));
        }
        if self.expire_after_access.is_zero() {
            return Err(CacheError::InvalidConfig(
                "expire-after-access must be greater than zero".to_string(),
            ));
        }

        let store = CacheStore::with_capacity(
            self.initial_capacity,
            self.maximum_size,
            self.expire_after_access,
        );
        Ok(LoadingCache::new(store, Arc::new(loader)))
    }
}
