//! User loader
//!
//! There is no backing store behind the user cache, so every load is a miss
//! and its outcome is decided by the configured [`MissPolicy`].

use std::collections::HashMap;

use tracing::info;

use crate::cache::CacheLoader;
use crate::error::Result;
use crate::models::User;
use crate::service::MissPolicy;

/// Loads user records for ids missing from the cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserLoader {
    policy: MissPolicy,
}

impl UserLoader {
    pub fn new(policy: MissPolicy) -> Self {
        Self { policy }
    }
}

impl CacheLoader<i64, User> for UserLoader {
    fn load(&self, key: &i64) -> Result<User> {
        info!("Loading user {} ({} policy)", key, self.policy);
        self.policy.resolve(*key)
    }

    fn load_all(&self, keys: &[i64]) -> Result<HashMap<i64, User>> {
        info!("Loading users {:?} ({} policy)", keys, self.policy);
        keys.iter()
            .map(|key| Ok((*key, self.policy.resolve(*key)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn test_sentinel_loader() {
        let loader = UserLoader::new(MissPolicy::Sentinel);
        assert!(loader.load(&5).unwrap().is_empty());

        let batch = loader.load_all(&[1, 2]).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.values().all(User::is_empty));
    }

    #[test]
    fn test_absent_loader() {
        let loader = UserLoader::new(MissPolicy::Absent);
        assert!(matches!(loader.load(&5), Err(CacheError::NotFound(_))));
        assert!(loader.load_all(&[1]).is_err());
    }
}
