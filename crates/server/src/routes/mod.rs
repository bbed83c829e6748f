//! HTTP route handlers for the user service.
//!
//! # Route Structure (nested under `/worko/user`)
//!
//! ```text
//! POST   /            - Create account (public; sets credential cookie)
//! GET    /find/{id}   - Fetch one record (public)
//! GET    /users       - List all records (public)
//! PUT    /{id}        - Full replace (credential + ownership)
//! PATCH  /{id}        - Partial update (credential + ownership)
//! DELETE /{id}        - Delete (credential + ownership)
//! ```

pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create))
        .route("/find/{id}", get(users::find))
        .route("/users", get(users::list))
        .route(
            "/{id}",
            put(users::replace).patch(users::patch).delete(users::delete),
        )
}
