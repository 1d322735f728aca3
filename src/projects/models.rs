//! Project data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Project database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Screenshot database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Screenshot {
    pub id: String,
    pub project_id: String,
    pub url: String,
    pub position: i64,
}

/// Compact author info embedded in project responses
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct ProjectAuthor {
    pub id: String,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Full project view returned by the API
#[derive(Serialize, Debug)]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub tags: Vec<String>,
    pub screenshots: Vec<Screenshot>,
    pub author: Option<ProjectAuthor>,
    /// Whether the current caller has liked this project (false for anonymous)
    pub liked_by_me: bool,
}

/// GET /api/projects query parameters
#[derive(Deserialize, Debug)]
pub struct ProjectQueryParams {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    /// "latest" (default) or "popular"
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Paginated feed response
#[derive(Serialize, Debug)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// POST /api/projects request body
#[derive(Deserialize, Debug)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// PUT /api/projects/:id request body
#[derive(Deserialize, Debug)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// GET /api/tags/suggest query
#[derive(Deserialize)]
pub struct TagSuggestQuery {
    pub q: String,
}

/// Tag suggestion response; `suggestion` is null below the minimum length
#[derive(Serialize, Debug)]
pub struct TagSuggestResponse {
    pub suggestion: Option<String>,
    pub existing: Vec<String>,
}

/// Screenshot upload response
#[derive(Serialize)]
pub struct ScreenshotUploadResponse {
    pub screenshots: Vec<Screenshot>,
    pub message: String,
}
