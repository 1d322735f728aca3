// src/users/handlers/profile.rs

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::{CheckUsernameQuery, PublicUser, UpdateProfileRequest, UsernameAvailability};
use super::super::validators::{validate_username, ProfileValidator};
use crate::auth::{AuthedUser, User};
use crate::common::{ApiError, AppState, Validator};

/// GET /api/users/:username - Public profile lookup
pub async fn get_user_by_username(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(username): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(&username)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, username = %username, "Database error fetching user by username");
            ApiError::DatabaseError(e)
        })?
        .ok_or_else(|| {
            warn!(username = %username, "User lookup failed: not found");
            ApiError::UserNotFound(format!("No user named {}", username))
        })?;

    Ok(Json(PublicUser::from(user)))
}

/// PUT /api/profile - Update the caller's own profile fields
///
/// Operates only on the authenticated user's row; there is no way to address
/// another user's profile through this handler.
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = ProfileValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            bio = COALESCE(?, bio),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.name.as_deref())
    .bind(request.bio.as_deref())
    .bind(authed.id())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id(), "Database error updating profile");
        ApiError::DatabaseError(e)
    })?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(authed.id())
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %user.id, "Profile updated successfully");

    Ok(Json(PublicUser::from(user)))
}

/// GET /api/users/check-username?username= - Availability check for onboarding
pub async fn check_username(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<CheckUsernameQuery>,
) -> Result<Json<UsernameAvailability>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validate_username(&query.username);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(&query.username)
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, username = %query.username, "Database error checking username");
            ApiError::DatabaseError(e)
        })?;

    Ok(Json(UsernameAvailability {
        username: query.username,
        available: taken == 0,
    }))
}
