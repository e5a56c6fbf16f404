//! Loading Cache Module
//!
//! Thread-safe handle over a [`CacheStore`] that fills misses from a
//! [`CacheLoader`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, warn};

use crate::cache::{CacheLoader, CacheStats, CacheStore};
use crate::error::{CacheError, Result};

/// A load in progress for one key. Concurrent misses share it.
type Flight<V> = Arc<OnceCell<V>>;

struct Shared<K, V> {
    store: RwLock<CacheStore<K, V>>,
    in_flight: Mutex<HashMap<K, Flight<V>>>,
    loader: Arc<dyn CacheLoader<K, V>>,
}

// == Loading Cache ==
/// Bounded, expire-after-access cache that loads missing values on demand.
///
/// Cloning is cheap and every clone shares the same entries, so one instance
/// is built at startup and handed to whoever needs it.
///
/// Misses for the same key are coalesced: the first caller runs the loader,
/// callers arriving while it runs wait for and share its result. No lock on
/// the entry table is held while the loader runs.
pub struct LoadingCache<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K, V> Clone for LoadingCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, V> LoadingCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Wraps an existing store. Most callers want
    /// [`CacheBuilder`](crate::cache::CacheBuilder) instead.
    pub fn new(store: CacheStore<K, V>, loader: Arc<dyn CacheLoader<K, V>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: RwLock::new(store),
                in_flight: Mutex::new(HashMap::new()),
                loader,
            }),
        }
    }

    // == Get ==
    /// Returns the value for `key`, loading and caching it on a miss.
    ///
    /// A loader error is returned to this caller only; nothing is cached.
    pub async fn get(&self, key: K) -> Result<V> {
        let cached = self.shared.store.write().await.get(&key);
        match cached {
            Some(value) => Ok(value),
            None => self.load(key).await,
        }
    }

    async fn load(&self, key: K) -> Result<V> {
        let flight = {
            let mut in_flight = self.shared.in_flight.lock().await;
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };

        let result = flight
            .get_or_try_init(|| self.load_and_store(&key))
            .await
            .cloned();

        // Finished flights are dropped so a later miss loads afresh
        let mut in_flight = self.shared.in_flight.lock().await;
        if in_flight
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, &flight))
        {
            in_flight.remove(&key);
        }

        result
    }

    async fn load_and_store(&self, key: &K) -> Result<V> {
        // A flight that finished just before ours started has already stored it
        if let Some(value) = self.shared.store.write().await.peek_fresh(key) {
            return Ok(value);
        }

        debug!("Cache miss, invoking loader");
        let owned = key.clone();
        let loaded = self.run_loader(move |loader| loader.load(&owned)).await;

        let mut store = self.shared.store.write().await;
        match loaded {
            Ok(value) => {
                store.record_loads(1);
                Ok(store.get_or_insert(key.clone(), value))
            }
            Err(err) => {
                store.record_load_failure();
                warn!("Cache loader failed: {}", err);
                Err(err)
            }
        }
    }

    /// Runs a loader call on the blocking pool so a slow loader never stalls
    /// a runtime worker.
    async fn run_loader<T, F>(&self, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CacheLoader<K, V>) -> Result<T> + Send + 'static,
    {
        let loader = Arc::clone(&self.shared.loader);
        tokio::task::spawn_blocking(move || call(&*loader))
            .await
            .map_err(|err| CacheError::Internal(format!("loader task failed: {}", err)))?
    }

    // == Get All ==
    /// Resolves several keys at once.
    ///
    /// Present keys are read under a single lock. All missing keys go to the
    /// loader in one [`CacheLoader::load_all`] call; any key the batch result
    /// leaves out is loaded individually. A key written while the batch was
    /// loading keeps the written value.
    pub async fn get_all<I>(&self, keys: I) -> Result<HashMap<K, V>>
    where
        I: IntoIterator<Item = K>,
    {
        let mut resolved = HashMap::new();
        let mut missing = Vec::new();
        {
            let mut store = self.shared.store.write().await;
            let mut seen = HashSet::new();
            for key in keys {
                if !seen.insert(key.clone()) {
                    continue;
                }
                match store.get(&key) {
                    Some(value) => {
                        resolved.insert(key, value);
                    }
                    None => missing.push(key),
                }
            }
        }

        if missing.is_empty() {
            return Ok(resolved);
        }

        debug!("Batch loading {} missing keys", missing.len());
        let batch = missing.clone();
        let mut loaded = match self.run_loader(move |loader| loader.load_all(&batch)).await {
            Ok(loaded) => loaded,
            Err(err) => return Err(self.load_failed(err).await),
        };

        let omitted: Vec<K> = missing
            .iter()
            .filter(|key| !loaded.contains_key(*key))
            .cloned()
            .collect();
        if !omitted.is_empty() {
            let singles = self
                .run_loader(move |loader| {
                    omitted
                        .iter()
                        .map(|key| Ok((key.clone(), loader.load(key)?)))
                        .collect::<Result<HashMap<K, V>>>()
                })
                .await;
            match singles {
                Ok(singles) => loaded.extend(singles),
                Err(err) => return Err(self.load_failed(err).await),
            }
        }

        let mut store = self.shared.store.write().await;
        store.record_loads(missing.len() as u64);
        for key in missing {
            let value = loaded.remove(&key).ok_or_else(|| {
                CacheError::Internal("loaded value disappeared from batch".to_string())
            })?;
            let value = store.get_or_insert(key.clone(), value);
            resolved.insert(key, value);
        }

        Ok(resolved)
    }

    async fn load_failed(&self, err: CacheError) -> CacheError {
        self.shared.store.write().await.record_load_failure();
        warn!("Cache batch loader failed: {}", err);
        err
    }

    // == Put ==
    /// Inserts or overwrites the value for `key`.
    pub async fn put(&self, key: K, value: V) {
        self.shared.store.write().await.insert(key, value);
    }

    // == Compute ==
    /// Atomically replaces the value for `key` with `f(current)`.
    ///
    /// `f` always runs under the store's write lock against the live value,
    /// so concurrent computes on one key are applied one after another and
    /// none is lost. On a miss the value is loaded first; if the loaded entry
    /// is removed again before the lock is retaken, the key is resolved anew
    /// rather than applying `f` to the removed value.
    pub async fn compute<F>(&self, key: K, f: F) -> Result<V>
    where
        F: FnOnce(V) -> V,
    {
        let mut first_attempt = true;
        loop {
            {
                let mut store = self.shared.store.write().await;
                // Only the first lookup counts towards hit/miss stats
                let current = if first_attempt {
                    store.get(&key)
                } else {
                    store.peek_fresh(&key)
                };
                if let Some(current) = current {
                    let updated = f(current);
                    store.insert(key, updated.clone());
                    return Ok(updated);
                }
            }
            first_attempt = false;
            self.load(key.clone()).await?;
        }
    }

    // == Invalidate ==
    /// Discards the entry for `key`. Missing keys are ignored.
    pub async fn invalidate(&self, key: &K) {
        self.shared.store.write().await.remove(key);
    }

    /// Discards every entry.
    pub async fn invalidate_all(&self) {
        self.shared.store.write().await.clear();
    }

    // == Remove ==
    /// Discards the entry for `key` and returns its value if it was live.
    pub async fn remove(&self, key: &K) -> Option<V> {
        self.shared.store.write().await.remove(key)
    }

    // == Snapshot ==
    /// Point-in-time copy of the live entries. Does not refresh access times.
    pub async fn snapshot(&self) -> Vec<(K, V)> {
        self.shared.store.read().await.snapshot()
    }

    /// Point-in-time copy of the live values.
    pub async fn values(&self) -> Vec<V> {
        self.snapshot()
            .await
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    // == Maintenance ==
    /// Sweeps expired entries, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.shared.store.write().await.cleanup_expired()
    }

    /// Number of stored entries, including expired entries not yet swept.
    pub async fn len(&self) -> usize {
        self.shared.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.store.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.shared.store.read().await.stats()
    }
}
