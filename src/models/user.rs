//! User record stored in the cache

use serde::{Deserialize, Serialize};

/// A user record as stored in the cache and exchanged over HTTP.
///
/// Every field is optional because the miss sentinel carries no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(alias = "isMan")]
    pub is_male: Option<bool>,
    pub image_name: Option<String>,
}

impl User {
    /// The placeholder returned for ids that have no record.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}
