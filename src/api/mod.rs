//! API Module
//!
//! HTTP handlers and routing for the user REST API.
//!
//! # Endpoints
//! - `GET /user/list` - List live user records
//! - `POST /user/addWithImage` - Store a record with an avatar upload
//! - `POST /user/add` - Store a record (multipart)
//! - `POST /user/v2/add` - Store a record (JSON)
//! - `PUT /user/update` - Merge fields into a record
//! - `DELETE /user/:id` - Remove a record
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
