//! Like routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the likes router
///
/// # Routes
/// - `POST /api/projects/:id/like` - Toggle project like
/// - `POST /api/comments/:id/like` - Toggle comment like
pub fn likes_routes() -> Router {
    Router::new()
        .route(
            "/api/projects/:id/like",
            post(handlers::toggle_project_like_handler),
        )
        .route(
            "/api/comments/:id/like",
            post(handlers::toggle_comment_like_handler),
        )
}
