//! API Routes
//!
//! Configures the Axum router with all user service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_user_form, add_user_json, add_user_with_image, delete_user, health_handler, list_users,
    stats_handler, update_user, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /user/list` - All live records
/// - `POST /user/addWithImage` - Multipart record plus avatar upload
/// - `POST /user/add` - Multipart record
/// - `POST /user/v2/add` - JSON record
/// - `PUT /user/update` - Partial update
/// - `DELETE /user/:id` - Remove a record
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let users = Router::new()
        .route("/list", get(list_users))
        .route("/addWithImage", post(add_user_with_image))
        .route("/add", post(add_user_form))
        .route("/v2/add", post(add_user_json))
        .route("/update", put(update_user))
        .route("/:id", delete(delete_user));

    Router::new()
        .nest("/user", users)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
