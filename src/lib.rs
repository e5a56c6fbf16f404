//! User Cache - A small user record REST service
//!
//! Records live in a bounded, expire-after-access loading cache with LRU
//! eviction and a configurable policy for unknown ids.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
