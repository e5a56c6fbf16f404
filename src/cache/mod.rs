//! Cache Module
//!
//! Provides a bounded, expire-after-access loading cache.

mod builder;
mod entry;
mod loader;
mod loading;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use builder::{
    CacheBuilder, DEFAULT_EXPIRE_AFTER_ACCESS, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAXIMUM_SIZE,
};
pub use entry::CacheEntry;
pub use loader::CacheLoader;
pub use loading::LoadingCache;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
