// src/likes/handlers.rs
//! Like toggle handlers and the shared transactional toggle
//!
//! The delete-or-create step and the counter adjustment run in a single
//! transaction. The unique `(user_id, target)` constraint is the backstop for
//! races: a duplicate insert is mapped to "already liked" and the counter is
//! reconciled from the authoritative row count instead of failing.

use axum::{
    extract::{Extension, Path},
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::LikeStatus;
use crate::auth::extractors::is_unique_violation;
use crate::auth::AuthedUser;
use crate::common::{generate_like_id, ApiError, AppState};

/// Which table pair a toggle operates on
#[derive(Debug, Clone, Copy)]
pub(crate) enum LikeTarget {
    Project,
    Comment,
}

impl LikeTarget {
    fn like_table(self) -> &'static str {
        match self {
            LikeTarget::Project => "project_likes",
            LikeTarget::Comment => "comment_likes",
        }
    }

    fn target_column(self) -> &'static str {
        match self {
            LikeTarget::Project => "project_id",
            LikeTarget::Comment => "comment_id",
        }
    }

    fn counter_table(self) -> &'static str {
        match self {
            LikeTarget::Project => "projects",
            LikeTarget::Comment => "comments",
        }
    }
}

/// POST /api/projects/:id/like - Toggle the caller's like on a project
pub async fn toggle_project_like_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
) -> Result<Json<LikeStatus>, ApiError> {
    let state = state_lock.read().await.clone();

    let status = toggle_project_like(&state.db, authed.id(), &project_id).await?;

    info!(
        user_id = %authed.id(),
        project_id = %project_id,
        liked = status.liked,
        like_count = status.like_count,
        "Project like toggled"
    );

    Ok(Json(status))
}

/// POST /api/comments/:id/like - Toggle the caller's like on a comment
pub async fn toggle_comment_like_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(comment_id): Path<String>,
) -> Result<Json<LikeStatus>, ApiError> {
    let state = state_lock.read().await.clone();

    let status = toggle_comment_like(&state.db, authed.id(), &comment_id).await?;

    info!(
        user_id = %authed.id(),
        comment_id = %comment_id,
        liked = status.liked,
        like_count = status.like_count,
        "Comment like toggled"
    );

    Ok(Json(status))
}

/// Toggle a project like and return the authoritative `(liked, count)` pair
pub async fn toggle_project_like(
    db: &SqlitePool,
    user_id: &str,
    project_id: &str,
) -> Result<LikeStatus, ApiError> {
    ensure_target_exists(db, "projects", project_id).await?;
    toggle_like(db, user_id, project_id, LikeTarget::Project).await
}

/// Toggle a comment like and return the authoritative `(liked, count)` pair
pub async fn toggle_comment_like(
    db: &SqlitePool,
    user_id: &str,
    comment_id: &str,
) -> Result<LikeStatus, ApiError> {
    ensure_target_exists(db, "comments", comment_id).await?;
    toggle_like(db, user_id, comment_id, LikeTarget::Comment).await
}

async fn ensure_target_exists(
    db: &SqlitePool,
    table: &str,
    target_id: &str,
) -> Result<(), ApiError> {
    let exists: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE id = ?", table))
        .bind(target_id)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if exists == 0 {
        return Err(ApiError::NotFound(format!(
            "Target not found: {}",
            target_id
        )));
    }

    Ok(())
}

async fn toggle_like(
    db: &SqlitePool,
    user_id: &str,
    target_id: &str,
    target: LikeTarget,
) -> Result<LikeStatus, ApiError> {
    let like_table = target.like_table();
    let target_column = target.target_column();
    let counter_table = target.counter_table();

    let mut tx = db.begin().await.map_err(ApiError::DatabaseError)?;

    let existing: Option<String> = sqlx::query_scalar(&format!(
        "SELECT id FROM {} WHERE user_id = ? AND {} = ?",
        like_table, target_column
    ))
    .bind(user_id)
    .bind(target_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    let liked = if let Some(like_id) = existing {
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?", like_table))
            .bind(&like_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        sqlx::query(&format!(
            "UPDATE {} SET like_count = like_count - 1 WHERE id = ? AND like_count > 0",
            counter_table
        ))
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        false
    } else {
        insert_like(&mut tx, user_id, target_id, target).await?;
        true
    };

    let like_count: i64 = sqlx::query_scalar(&format!(
        "SELECT like_count FROM {} WHERE id = ?",
        counter_table
    ))
    .bind(target_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    Ok(LikeStatus { liked, like_count })
}

/// Create the like row and bump the counter.
///
/// A duplicate insert means a racing toggle from the same user won; that is
/// "already liked", not an error, and the counter is resynced from the
/// authoritative row count.
pub(crate) async fn insert_like(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: &str,
    target_id: &str,
    target: LikeTarget,
) -> Result<(), ApiError> {
    let like_table = target.like_table();
    let target_column = target.target_column();
    let counter_table = target.counter_table();

    let insert = sqlx::query(&format!(
        "INSERT INTO {} (id, user_id, {}) VALUES (?, ?, ?)",
        like_table, target_column
    ))
    .bind(generate_like_id())
    .bind(user_id)
    .bind(target_id)
    .execute(&mut **tx)
    .await;

    match insert {
        Ok(_) => {
            sqlx::query(&format!(
                "UPDATE {} SET like_count = like_count + 1 WHERE id = ?",
                counter_table
            ))
            .bind(target_id)
            .execute(&mut **tx)
            .await
            .map_err(ApiError::DatabaseError)?;
        }
        Err(e) if is_unique_violation(&e) => {
            sqlx::query(&format!(
                "UPDATE {ct} SET like_count = \
                 (SELECT COUNT(*) FROM {lt} WHERE {col} = ?) WHERE id = ?",
                ct = counter_table,
                lt = like_table,
                col = target_column
            ))
            .bind(target_id)
            .bind(target_id)
            .execute(&mut **tx)
            .await
            .map_err(ApiError::DatabaseError)?;
        }
        Err(e) => {
            error!(error = %e, user_id = %user_id, target_id = %target_id, "Database error inserting like");
            return Err(ApiError::DatabaseError(e));
        }
    }

    Ok(())
}
