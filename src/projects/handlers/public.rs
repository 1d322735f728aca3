// src/projects/handlers/public.rs

use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::auth::MaybeUser;
use crate::common::{ApiError, AppState};
use crate::projects::models::*;
use crate::projects::tags::{sanitize_tag, suggest_tag};

/// GET /api/projects - Project feed with filters and pagination
pub async fn list_projects(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(viewer): MaybeUser,
    Query(params): Query<ProjectQueryParams>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let tag_filter = params.tag.as_deref().map(sanitize_tag);
    let search_pattern = params
        .search
        .as_deref()
        .map(|s| format!("%{}%", s.trim()));

    let order_by = match params.sort.as_deref() {
        Some("popular") => " ORDER BY p.like_count DESC, p.created_at DESC",
        _ => " ORDER BY p.created_at DESC",
    };

    let total: i64 = {
        let mut qb = feed_query("SELECT COUNT(*) FROM projects p", &tag_filter, &params.category, &search_pattern);
        qb.build_query_scalar()
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    };

    let projects: Vec<Project> = {
        let mut qb = feed_query("SELECT p.* FROM projects p", &tag_filter, &params.category, &search_pattern);
        qb.push(order_by);
        qb.push(" LIMIT ");
        qb.push_bind(limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(offset as i64);
        qb.build_query_as()
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    };

    let viewer_id = viewer.as_ref().map(|u| u.id.clone());
    let mut project_responses = Vec::with_capacity(projects.len());
    for project in projects {
        project_responses.push(load_project_response(&state.db, project, viewer_id.as_deref()).await?);
    }

    debug!(
        project_count = project_responses.len(),
        total = total,
        page = page,
        limit = limit,
        "Successfully loaded paginated project feed"
    );

    Ok(Json(ProjectListResponse {
        projects: project_responses,
        total: total as usize,
        page,
        page_size: limit,
    }))
}

/// GET /api/projects/:id - Project detail
///
/// The project row and its satellite rows (tags, screenshots, author, the
/// caller's like) are fetched concurrently. The view-count bump is non-fatal.
pub async fn get_project_by_id(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(viewer): MaybeUser,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&project_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound(format!("Project not found: {}", project_id)))?;

    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let response = load_project_response(&state.db, project, viewer_id).await?;

    // Fire-and-forget view bump; a lost increment never fails the read
    if let Err(e) = sqlx::query("UPDATE projects SET view_count = view_count + 1 WHERE id = ?")
        .bind(&project_id)
        .execute(&state.db)
        .await
    {
        warn!(error = %e, project_id = %project_id, "Failed to bump view count");
    }

    debug!(project_id = %project_id, "Successfully loaded project details");

    Ok(Json(response))
}

/// GET /api/tags/suggest?q= - Normalized tag suggestion plus matching stored tags
pub async fn suggest_tags(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<TagSuggestQuery>,
) -> Result<Json<TagSuggestResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let suggestion = suggest_tag(&query.q);

    let existing = match &suggestion {
        Some(prefix) => sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT tag FROM project_tags WHERE tag LIKE ? ORDER BY tag LIMIT 10",
        )
        .bind(format!("{}%", prefix))
        .fetch_all(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching tag suggestions");
            ApiError::DatabaseError(e)
        })?,
        None => Vec::new(),
    };

    Ok(Json(TagSuggestResponse {
        suggestion,
        existing,
    }))
}

fn feed_query<'a>(
    select: &str,
    tag: &'a Option<String>,
    category: &'a Option<String>,
    search: &'a Option<String>,
) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(select);

    if let Some(tag) = tag {
        qb.push(" JOIN project_tags pt ON pt.project_id = p.id AND pt.tag = ");
        qb.push_bind(tag);
    }

    qb.push(" WHERE 1 = 1");

    if let Some(category) = category {
        qb.push(" AND p.category = ");
        qb.push_bind(category);
    }

    if let Some(pattern) = search {
        qb.push(" AND (p.title LIKE ");
        qb.push_bind(pattern);
        qb.push(" OR p.description LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    qb
}

/// Assemble the full API view of a project; satellite queries run concurrently
pub(crate) async fn load_project_response(
    db: &SqlitePool,
    project: Project,
    viewer_id: Option<&str>,
) -> Result<ProjectResponse, ApiError> {
    let tags_fut = sqlx::query_scalar::<_, String>(
        "SELECT tag FROM project_tags WHERE project_id = ? ORDER BY tag",
    )
    .bind(&project.id)
    .fetch_all(db);

    let screenshots_fut = sqlx::query_as::<_, Screenshot>(
        "SELECT * FROM project_screenshots WHERE project_id = ? ORDER BY position",
    )
    .bind(&project.id)
    .fetch_all(db);

    let author_fut = sqlx::query_as::<_, ProjectAuthor>(
        "SELECT id, username, avatar_url FROM users WHERE id = ?",
    )
    .bind(&project.user_id)
    .fetch_optional(db);

    let (tags, screenshots, author) = tokio::join!(tags_fut, screenshots_fut, author_fut);

    let tags = tags.map_err(ApiError::DatabaseError)?;
    let screenshots = screenshots.map_err(ApiError::DatabaseError)?;
    let author = author.map_err(ApiError::DatabaseError)?;

    let liked_by_me = match viewer_id {
        Some(viewer_id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM project_likes WHERE user_id = ? AND project_id = ?",
            )
            .bind(viewer_id)
            .bind(&project.id)
            .fetch_one(db)
            .await
            .map_err(ApiError::DatabaseError)?
                > 0
        }
        None => false,
    };

    Ok(ProjectResponse {
        project,
        tags,
        screenshots,
        author,
        liked_by_me,
    })
}
