// src/comments/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{Comment, CommentResponse, CreateCommentRequest, UpdateCommentRequest};
use super::validators::validate_content;
use crate::auth::{require_owner, AuthedUser};
use crate::common::{generate_comment_id, ApiError, AppState};
use crate::projects::handlers::manage::project_owner;

const COMMENT_WITH_AUTHOR: &str = r#"
    SELECT c.id, c.project_id, c.user_id, c.content, c.like_count,
           c.created_at, c.updated_at,
           u.username AS author_username, u.avatar_url AS author_avatar_url
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

/// GET /api/projects/:id/comments - List a project's comments
pub async fn list_comments(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let state = state_lock.read().await.clone();

    // 404s for unknown projects rather than returning an empty list
    project_owner(&state.db, &project_id).await?;

    let comments = sqlx::query_as::<_, CommentResponse>(&format!(
        "{} WHERE c.project_id = ? ORDER BY c.created_at ASC",
        COMMENT_WITH_AUTHOR
    ))
    .bind(&project_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, project_id = %project_id, "Database error fetching comments");
        ApiError::DatabaseError(e)
    })?;

    Ok(Json(comments))
}

/// POST /api/projects/:id/comments - Create a comment
///
/// The comment row and the project's denormalized comment_count change
/// together in one transaction.
pub async fn create_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validate_content(&request.content);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    project_owner(&state.db, &project_id).await?;

    let comment_id = generate_comment_id();

    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query(
        "INSERT INTO comments (id, project_id, user_id, content) VALUES (?, ?, ?, ?)",
    )
    .bind(&comment_id)
    .bind(&project_id)
    .bind(authed.id())
    .bind(request.content.trim())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, project_id = %project_id, "Database error creating comment");
        ApiError::DatabaseError(e)
    })?;

    sqlx::query("UPDATE projects SET comment_count = comment_count + 1 WHERE id = ?")
        .bind(&project_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.id(),
        project_id = %project_id,
        comment_id = %comment_id,
        "Comment created successfully"
    );

    let comment = fetch_comment_response(&state.db, &comment_id).await?;
    Ok(Json(comment))
}

/// PUT /api/comments/:id - Edit an owned comment
pub async fn update_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(comment_id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validate_content(&request.content);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let comment = fetch_comment(&state.db, &comment_id).await?;
    require_owner(&comment.user_id, authed.id()).map_err(|e| {
        warn!(
            user_id = %authed.id(),
            comment_id = %comment_id,
            "Comment update denied: caller does not own the comment"
        );
        e
    })?;

    sqlx::query(
        "UPDATE comments SET content = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(request.content.trim())
    .bind(&comment_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id(), comment_id = %comment_id, "Comment updated successfully");

    let comment = fetch_comment_response(&state.db, &comment_id).await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/:id - Delete an owned comment
pub async fn delete_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let comment = fetch_comment(&state.db, &comment_id).await?;
    require_owner(&comment.user_id, authed.id()).map_err(|e| {
        warn!(
            user_id = %authed.id(),
            comment_id = %comment_id,
            "Comment deletion denied: caller does not own the comment"
        );
        e
    })?;

    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(&comment_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

    sqlx::query(
        "UPDATE projects SET comment_count = comment_count - 1 WHERE id = ? AND comment_count > 0",
    )
    .bind(&comment.project_id)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id(), comment_id = %comment_id, "Comment deleted successfully");

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_comment(db: &SqlitePool, comment_id: &str) -> Result<Comment, ApiError> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound(format!("Comment not found: {}", comment_id)))
}

async fn fetch_comment_response(
    db: &SqlitePool,
    comment_id: &str,
) -> Result<CommentResponse, ApiError> {
    sqlx::query_as::<_, CommentResponse>(&format!("{} WHERE c.id = ?", COMMENT_WITH_AUTHOR))
        .bind(comment_id)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)
}
