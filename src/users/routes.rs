//! User profile routes

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

/// Creates and returns the users router
///
/// # Routes
/// - `GET /api/users/check-username` - Username availability
/// - `GET /api/users/:username` - Public profile
/// - `PUT /api/profile` - Update own profile
/// - `POST /api/profile/avatar` - Upload avatar
pub fn users_routes() -> Router {
    Router::new()
        // check-username must be registered before the :username matcher
        .route(
            "/api/users/check-username",
            get(handlers::profile::check_username),
        )
        .route(
            "/api/users/:username",
            get(handlers::profile::get_user_by_username),
        )
        .route("/api/profile", put(handlers::profile::update_profile))
        .route("/api/profile/avatar", post(handlers::avatar::upload_avatar))
}
