//! Project routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the projects router
///
/// # Routes
/// - `GET /api/projects` - Feed with filters (category, tag, search, sort)
/// - `GET /api/projects/:id` - Project detail
/// - `POST /api/projects` - Create (auth)
/// - `PUT /api/projects/:id` / `DELETE /api/projects/:id` - Owner only
/// - `POST /api/projects/:id/screenshots` - Owner only
/// - `GET /api/tags/suggest` - Tag normalization/suggestions
pub fn projects_routes() -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::public::list_projects).post(handlers::manage::create_project),
        )
        .route(
            "/api/projects/:id",
            get(handlers::public::get_project_by_id)
                .put(handlers::manage::update_project)
                .delete(handlers::manage::delete_project),
        )
        .route(
            "/api/projects/:id/screenshots",
            post(handlers::screenshots::upload_screenshots),
        )
        .route("/api/tags/suggest", get(handlers::public::suggest_tags))
}
