// src/admin/routes.rs

use axum::{
    routing::{delete, get, put},
    Router,
};

use super::handlers;

pub fn admin_routes() -> Router {
    Router::new()
        // Dashboard
        .route(
            "/api/admin/dashboard/metrics",
            get(handlers::dashboard::get_dashboard_metrics),
        )
        // User moderation
        .route("/api/admin/users", get(handlers::users::get_admin_users))
        .route(
            "/api/admin/users/:id",
            put(handlers::users::update_user_moderation),
        )
        // Project moderation
        .route(
            "/api/admin/projects",
            get(handlers::projects::get_admin_projects),
        )
        .route(
            "/api/admin/projects/:id",
            delete(handlers::projects::delete_admin_project),
        )
}
