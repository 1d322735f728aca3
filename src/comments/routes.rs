//! Comment routes

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

/// Creates and returns the comments router
///
/// # Routes
/// - `GET /api/projects/:id/comments` - List comments
/// - `POST /api/projects/:id/comments` - Create (auth)
/// - `PUT /api/comments/:id` / `DELETE /api/comments/:id` - Owner only
pub fn comments_routes() -> Router {
    Router::new()
        .route(
            "/api/projects/:id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/api/comments/:id",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
}
