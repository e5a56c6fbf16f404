//! User Service Module
//!
//! Wires the generic loading cache to user records.

mod loader;
mod policy;

pub use loader::UserLoader;
pub use policy::MissPolicy;

use crate::cache::{CacheBuilder, LoadingCache};
use crate::config::Config;
use crate::error::Result;
use crate::models::User;

/// Cache of user records keyed by id.
pub type UserCache = LoadingCache<i64, User>;

/// Builds the user cache described by `config`.
pub fn build_user_cache(config: &Config) -> Result<UserCache> {
    CacheBuilder::new()
        .initial_capacity(config.initial_capacity)
        .maximum_size(config.max_entries)
        .expire_after_access(config.expire_after_access())
        .build(UserLoader::new(config.miss_policy))
}
