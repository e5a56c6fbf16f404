//! Request and Response models for the user API
//!
//! This module defines the user record and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use requests::{require_id, UpdateUserRequest};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
pub use user::User;
