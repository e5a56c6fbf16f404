//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::service::MissPolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entries to preallocate in the cache
    pub initial_capacity: usize,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Seconds without a read or write before an entry expires
    pub expire_after_access: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Outcome of looking up an unknown user id
    pub miss_policy: MissPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `INITIAL_CAPACITY` - Preallocated cache entries (default: 100)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `EXPIRE_AFTER_ACCESS` - Idle expiry in seconds (default: 1800)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `MISS_POLICY` - `sentinel` or `absent` (default: sentinel)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity: env_or("INITIAL_CAPACITY", defaults.initial_capacity),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            expire_after_access: env_or("EXPIRE_AFTER_ACCESS", defaults.expire_after_access),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            miss_policy: env_or("MISS_POLICY", defaults.miss_policy),
        }
    }

    pub fn expire_after_access(&self) -> Duration {
        Duration::from_secs(self.expire_after_access)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

/// Reads and parses `name`, falling back to `default` when the variable is
/// unset or does not parse.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 100,
            max_entries: 10_000,
            expire_after_access: 30 * 60,
            server_port: 8080,
            cleanup_interval: 60,
            miss_policy: MissPolicy::Sentinel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.initial_capacity, 100);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.expire_after_access(), Duration::from_secs(1800));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cleanup_interval(), Duration::from_secs(60));
        assert_eq!(config.miss_policy, MissPolicy::Sentinel);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "INITIAL_CAPACITY",
            "MAX_ENTRIES",
            "EXPIRE_AFTER_ACCESS",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
            "MISS_POLICY",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.expire_after_access, 1800);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.miss_policy, MissPolicy::Sentinel);
    }

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("USER_CACHE_TEST_PORT", "9090");
        env::set_var("USER_CACHE_TEST_POLICY", "not-a-policy");

        assert_eq!(env_or("USER_CACHE_TEST_PORT", 1u16), 9090);
        assert_eq!(
            env_or("USER_CACHE_TEST_POLICY", MissPolicy::Absent),
            MissPolicy::Absent
        );
        assert_eq!(env_or("USER_CACHE_TEST_UNSET", 7usize), 7);

        env::remove_var("USER_CACHE_TEST_PORT");
        env::remove_var("USER_CACHE_TEST_POLICY");
    }
}
