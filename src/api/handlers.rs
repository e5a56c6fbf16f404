//! API Handlers
//!
//! HTTP request handlers for each user endpoint. Every handler is a thin
//! translation onto one or two [`UserCache`] calls.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{require_id, HealthResponse, StatsResponse, UpdateUserRequest, User};
use crate::service::{build_user_cache, MissPolicy, UserCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared user cache
    pub cache: UserCache,
    /// Outcome of deleting an id that has no record
    pub miss_policy: MissPolicy,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: UserCache, miss_policy: MissPolicy) -> Self {
        Self { cache, miss_policy }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = build_user_cache(config)?;
        Ok(Self::new(cache, config.miss_policy))
    }
}

/// Parts of a multipart user submission.
#[derive(Debug, Default)]
struct UserForm {
    user: Option<User>,
    image_name: Option<String>,
}

async fn read_user_form(mut multipart: Multipart) -> Result<UserForm> {
    let mut form = UserForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CacheError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "user" => {
                let bytes = field.bytes().await.map_err(|e| {
                    CacheError::InvalidRequest(format!("Unreadable 'user' part: {}", e))
                })?;
                let user = serde_json::from_slice(&bytes).map_err(|e| {
                    CacheError::InvalidRequest(format!("Invalid 'user' part: {}", e))
                })?;
                form.user = Some(user);
            }
            "image" => {
                let image_name = field
                    .file_name()
                    .filter(|file_name| !file_name.is_empty())
                    .unwrap_or(name.as_str())
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    CacheError::InvalidRequest(format!("Unreadable 'image' part: {}", e))
                })?;
                debug!("Received image '{}' ({} bytes)", image_name, bytes.len());
                form.image_name = Some(image_name);
            }
            other => debug!("Ignoring multipart part '{}'", other),
        }
    }

    Ok(form)
}

fn missing_part(part: &str) -> CacheError {
    CacheError::InvalidRequest(format!("Missing '{}' part", part))
}

async fn store_user(state: &AppState, user: User) -> Result<Json<User>> {
    let id = require_id(&user)?;
    state.cache.put(id, user.clone()).await;
    info!("Stored user {}", id);
    Ok(Json(user))
}

/// Handler for GET /user/list
///
/// Returns every live record, including miss sentinels.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.cache.values().await)
}

/// Handler for POST /user/addWithImage
///
/// Multipart with a JSON `user` part and an `image` file part. The stored
/// record's `imageName` is the uploaded file's name.
pub async fn add_user_with_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<User>> {
    let form = read_user_form(multipart).await?;
    let mut user = form.user.ok_or_else(|| missing_part("user"))?;
    user.image_name = Some(form.image_name.ok_or_else(|| missing_part("image"))?);

    store_user(&state, user).await
}

/// Handler for POST /user/add
///
/// Multipart with a JSON `user` part.
pub async fn add_user_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<User>> {
    let form = read_user_form(multipart).await?;
    let user = form.user.ok_or_else(|| missing_part("user"))?;

    store_user(&state, user).await
}

/// Handler for POST /user/v2/add
///
/// Same as `/user/add` with the record as a plain JSON body.
pub async fn add_user_json(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<User>> {
    store_user(&state, user).await
}

/// Handler for PUT /user/update
///
/// Merges the supplied fields into the stored record atomically and returns
/// the merged record.
pub async fn update_user(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let id = req.id;
    let user = state.cache.compute(id, move |current| req.apply(current)).await?;
    info!("Updated user {}", id);

    Ok(Json(user))
}

/// Handler for DELETE /user/:id
///
/// Removes the record and returns it. Unknown ids follow the miss policy.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    let removed = match state.cache.remove(&id).await {
        Some(user) => user,
        None => state.miss_policy.resolve(id)?,
    };
    info!("Deleted user {}", id);

    Ok(Json(removed))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
