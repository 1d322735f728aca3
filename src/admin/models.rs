//! Admin dashboard and moderation models

use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::projects::models::Project;

/// GET /api/admin/users query parameters
#[derive(Deserialize, Debug)]
pub struct AdminUserQuery {
    /// Matches against username and email
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Paginated moderation user list
#[derive(Serialize, Debug)]
pub struct AdminUserListResponse {
    pub users: Vec<User>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// PUT /api/admin/users/:id request body
///
/// `role` changes are admin-only; the remaining fields are open to
/// moderators as well.
#[derive(Deserialize, Debug)]
pub struct UpdateUserModerationRequest {
    pub role: Option<String>,
    pub status: Option<String>,
    pub verified: Option<bool>,
    pub admin_notes: Option<String>,
}

/// GET /api/admin/projects query parameters
#[derive(Deserialize, Debug)]
pub struct AdminProjectQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Paginated moderation project list
#[derive(Serialize, Debug)]
pub struct AdminProjectListResponse {
    pub projects: Vec<Project>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// GET /api/admin/dashboard/metrics response
#[derive(Serialize, Debug)]
pub struct DashboardMetrics {
    pub total_users: i64,
    pub total_projects: i64,
    pub total_comments: i64,
    pub total_likes: i64,
    pub suspended_users: i64,
    pub new_users_7d: i64,
    pub new_projects_7d: i64,
}
