// src/admin/handlers/dashboard.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::admin::models::DashboardMetrics;
use crate::auth::{require_admin_permission, MaybeUser};
use crate::common::{ApiError, AppState};

/// GET /api/admin/dashboard/metrics - Moderation dashboard metrics
pub async fn get_dashboard_metrics(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let state = state_lock.read().await.clone();

    let admin = require_admin_permission(user.as_ref())?;

    let total_users_fut =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&state.db);
    let total_projects_fut =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects").fetch_one(&state.db);
    let total_comments_fut =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments").fetch_one(&state.db);
    let total_likes_fut = sqlx::query_scalar::<_, i64>(
        "SELECT (SELECT COUNT(*) FROM project_likes) + (SELECT COUNT(*) FROM comment_likes)",
    )
    .fetch_one(&state.db);

    let (total_users, total_projects, total_comments, total_likes) = tokio::join!(
        total_users_fut,
        total_projects_fut,
        total_comments_fut,
        total_likes_fut
    );

    let suspended_users: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = 'suspended'")
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    let new_users_7d: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE created_at >= datetime('now', '-7 days')",
    )
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let new_projects_7d: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM projects WHERE created_at >= datetime('now', '-7 days')",
    )
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(admin_user_id = %admin.id, "Dashboard metrics fetched");

    Ok(Json(DashboardMetrics {
        total_users: total_users.map_err(ApiError::DatabaseError)?,
        total_projects: total_projects.map_err(ApiError::DatabaseError)?,
        total_comments: total_comments.map_err(ApiError::DatabaseError)?,
        total_likes: total_likes.map_err(ApiError::DatabaseError)?,
        suspended_users,
        new_users_7d,
        new_projects_7d,
    }))
}
