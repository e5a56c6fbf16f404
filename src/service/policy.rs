//! Miss policy
//!
//! Decides what a lookup of an unknown user id produces.

use std::fmt;
use std::str::FromStr;

use crate::error::{CacheError, Result};
use crate::models::User;

/// What to do when a user id has no record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissPolicy {
    /// Answer with [`User::empty`] and cache it under the requested id, as if
    /// it were a real record.
    #[default]
    Sentinel,
    /// Report [`CacheError::NotFound`]; nothing is cached.
    Absent,
}

impl MissPolicy {
    /// Produces the outcome of a miss for `id`.
    pub fn resolve(self, id: i64) -> Result<User> {
        match self {
            MissPolicy::Sentinel => Ok(User::empty()),
            MissPolicy::Absent => Err(CacheError::NotFound(format!("User {}", id))),
        }
    }
}

impl FromStr for MissPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" => Ok(MissPolicy::Sentinel),
            "absent" => Ok(MissPolicy::Absent),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown miss policy '{}', expected 'sentinel' or 'absent'",
                other
            ))),
        }
    }
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissPolicy::Sentinel => f.write_str("sentinel"),
            MissPolicy::Absent => f.write_str("absent"),
        }
    }
}
