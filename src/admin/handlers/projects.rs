// src/admin/handlers/projects.rs

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::admin::models::{AdminProjectListResponse, AdminProjectQuery};
use crate::auth::{require_role, MaybeUser, RequiredRole};
use crate::common::{ApiError, AppState};
use crate::projects::handlers::manage::remove_project_assets;
use crate::projects::models::Project;

/// GET /api/admin/projects - Moderation project list
pub async fn get_admin_projects(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(caller): MaybeUser,
    Query(params): Query<AdminProjectQuery>,
) -> Result<Json<AdminProjectListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let moderator = require_role(caller.as_ref(), RequiredRole::Moderator).map_err(|e| {
        warn!("Admin project list access denied");
        e
    })?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let search_pattern = params.search.as_deref().map(|s| format!("%{}%", s.trim()));

    let total: i64 = {
        let mut qb = project_query("SELECT COUNT(*) FROM projects", &search_pattern);
        qb.build_query_scalar()
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    };

    let projects: Vec<Project> = {
        let mut qb = project_query("SELECT * FROM projects", &search_pattern);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(offset as i64);
        qb.build_query_as()
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    };

    info!(
        admin_user_id = %moderator.id,
        project_count = projects.len(),
        "Moderation project list fetched"
    );

    Ok(Json(AdminProjectListResponse {
        projects,
        total: total as usize,
        page,
        page_size: limit,
    }))
}

/// DELETE /api/admin/projects/:id - Remove a project as a moderator
///
/// This is the role-gated moderation path; the owner path lives in the
/// projects module and the two do not overlap.
pub async fn delete_admin_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(caller): MaybeUser,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let moderator = require_role(caller.as_ref(), RequiredRole::Moderator).map_err(|e| {
        warn!(project_id = %project_id, "Admin project deletion access denied");
        e
    })?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE id = ?")
        .bind(&project_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if exists == 0 {
        return Err(ApiError::NotFound(format!(
            "Project not found: {}",
            project_id
        )));
    }

    remove_project_assets(&state, &project_id).await;

    sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(&project_id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, project_id = %project_id, "Database error deleting project");
            ApiError::DatabaseError(e)
        })?;

    info!(
        admin_user_id = %moderator.id,
        project_id = %project_id,
        "Project removed by moderation"
    );

    Ok(StatusCode::NO_CONTENT)
}

fn project_query<'a>(select: &str, search: &'a Option<String>) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" WHERE 1 = 1");

    if let Some(pattern) = search {
        qb.push(" AND (title LIKE ");
        qb.push_bind(pattern);
        qb.push(" OR description LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    qb
}
