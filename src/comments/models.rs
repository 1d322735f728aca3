//! Comment data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Comment database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Comment view with its author embedded
#[derive(FromRow, Serialize, Debug)]
pub struct CommentResponse {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
}

/// POST /api/projects/:id/comments request body
#[derive(Deserialize, Debug)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// PUT /api/comments/:id request body
#[derive(Deserialize, Debug)]
pub struct UpdateCommentRequest {
    pub content: String,
}
