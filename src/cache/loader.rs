//! Cache Loader Module
//!
//! Computes values for keys that are not present in a [`LoadingCache`](super::LoadingCache).

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Result;

// == Cache Loader ==
/// Produces values for cache misses.
///
/// Implementations may fail; the error is returned to the caller whose
/// lookup triggered the load and nothing is cached for that key.
pub trait CacheLoader<K, V>: Send + Sync {
    /// Computes the value for a single key.
    fn load(&self, key: &K) -> Result<V>;

    /// Computes values for a batch of missing keys.
    ///
    /// Keys left out of the returned map are loaded one at a time with
    /// [`load`](Self::load) by the cache. The default simply calls `load`
    /// for every key.
    fn load_all(&self, keys: &[K]) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash + Clone,
    {
        keys.iter()
            .map(|key| Ok((key.clone(), self.load(key)?)))
            .collect()
    }
}

impl<K, V, F> CacheLoader<K, V> for F
where
    F: Fn(&K) -> Result<V> + Send + Sync,
{
    fn load(&self, key: &K) -> Result<V> {
        self(key)
    }
}
