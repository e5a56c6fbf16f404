//! Request DTOs for the user API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::error::{CacheError, Result};
use crate::models::User;

/// Validates a record submitted to one of the create endpoints and returns
/// its id.
pub fn require_id(user: &User) -> Result<i64> {
    user.id
        .ok_or_else(|| CacheError::InvalidRequest("User id is required".to_string()))
}

/// Request body for PUT /user/update
///
/// Only `id` is required; any other field that is present replaces the
/// stored one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "isMan")]
    pub is_male: Option<bool>,
    #[serde(default)]
    pub image_name: Option<String>,
}

impl UpdateUserRequest {
    /// Merges this request into the stored record.
    pub fn apply(self, mut user: User) -> User {
        user.id = Some(self.id);
        if self.name.is_some() {
            user.name = self.name;
        }
        if self.is_male.is_some() {
            user.is_male = self.is_male;
        }
        if self.image_name.is_some() {
            user.image_name = self.image_name;
        }
        user
    }
}
