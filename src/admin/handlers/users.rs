// src/admin/handlers/users.rs

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::admin::models::{AdminUserListResponse, AdminUserQuery, UpdateUserModerationRequest};
use crate::auth::{require_admin_permission, require_role, MaybeUser, RequiredRole, User};
use crate::common::{ApiError, AppState};

const VALID_ROLES: &[&str] = &["user", "moderator", "admin"];
const VALID_STATUSES: &[&str] = &["active", "suspended"];

/// GET /api/admin/users - Moderation user list with search and pagination
pub async fn get_admin_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(caller): MaybeUser,
    Query(params): Query<AdminUserQuery>,
) -> Result<Json<AdminUserListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let admin = require_admin_permission(caller.as_ref()).map_err(|e| {
        warn!("Admin users list access denied");
        e
    })?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let search_pattern = params.search.as_deref().map(|s| format!("%{}%", s.trim()));

    let total: i64 = {
        let mut qb = user_query("SELECT COUNT(*) FROM users", &search_pattern, &params.role, &params.status);
        qb.build_query_scalar()
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    };

    let users: Vec<User> = {
        let mut qb = user_query("SELECT * FROM users", &search_pattern, &params.role, &params.status);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(offset as i64);
        qb.build_query_as()
            .fetch_all(&state.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching moderation user list");
                ApiError::DatabaseError(e)
            })?
    };

    info!(
        admin_user_id = %admin.id,
        user_count = users.len(),
        total = total,
        "Moderation user list fetched"
    );

    Ok(Json(AdminUserListResponse {
        users,
        total: total as usize,
        page,
        page_size: limit,
    }))
}

/// PUT /api/admin/users/:id - Moderate a user
///
/// Role changes are admin-only; status, verification, and admin notes are
/// open to moderators as well. Changing one's own role or status is an
/// invalid action.
pub async fn update_user_moderation(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(caller): MaybeUser,
    Path(target_user_id): Path<String>,
    Json(request): Json<UpdateUserModerationRequest>,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    // The widest gate a request might need; role changes re-gate below
    let moderator = require_role(caller.as_ref(), RequiredRole::Moderator).map_err(|e| {
        warn!(target_user_id = %target_user_id, "User moderation access denied");
        e
    })?;

    if request.role.is_none()
        && request.status.is_none()
        && request.verified.is_none()
        && request.admin_notes.is_none()
    {
        return Err(ApiError::InvalidAction(
            "At least one field must be provided for update".to_string(),
        ));
    }

    if let Some(role) = &request.role {
        // Admin-only capability, checked with the specific gate
        require_role(caller.as_ref(), RequiredRole::Admin)?;

        if !VALID_ROLES.contains(&role.as_str()) {
            return Err(ApiError::ValidationError(format!(
                "role: Role must be one of: {}",
                VALID_ROLES.join(", ")
            )));
        }
    }

    if let Some(status) = &request.status {
        if !VALID_STATUSES.contains(&status.as_str()) {
            return Err(ApiError::ValidationError(format!(
                "status: Status must be one of: {}",
                VALID_STATUSES.join(", ")
            )));
        }
    }

    if target_user_id == moderator.id && (request.role.is_some() || request.status.is_some()) {
        warn!(
            admin_user_id = %moderator.id,
            "User moderation failed: cannot change own role or status"
        );
        return Err(ApiError::InvalidAction(
            "Cannot change your own role or status".to_string(),
        ));
    }

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(&target_user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if exists == 0 {
        warn!(target_user_id = %target_user_id, "User moderation failed: user not found");
        return Err(ApiError::UserNotFound(format!(
            "No user with id {}",
            target_user_id
        )));
    }

    sqlx::query(
        r#"
        UPDATE users
        SET role = COALESCE(?, role),
            status = COALESCE(?, status),
            verified = COALESCE(?, verified),
            admin_notes = COALESCE(?, admin_notes),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.role.as_deref())
    .bind(request.status.as_deref())
    .bind(request.verified)
    .bind(request.admin_notes.as_deref())
    .bind(&target_user_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, target_user_id = %target_user_id, "Database error moderating user");
        ApiError::DatabaseError(e)
    })?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&target_user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        admin_user_id = %moderator.id,
        target_user_id = %target_user_id,
        role = %user.role,
        status = %user.status,
        "User moderated successfully"
    );

    Ok(Json(user))
}

fn user_query<'a>(
    select: &str,
    search: &'a Option<String>,
    role: &'a Option<String>,
    status: &'a Option<String>,
) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" WHERE 1 = 1");

    if let Some(pattern) = search {
        qb.push(" AND (username LIKE ");
        qb.push_bind(pattern);
        qb.push(" OR email LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(role) = role {
        qb.push(" AND role = ");
        qb.push_bind(role);
    }

    if let Some(status) = status {
        qb.push(" AND status = ");
        qb.push_bind(status);
    }

    qb
}
