// src/projects/handlers/manage.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::auth::{require_owner, AuthedUser};
use crate::common::{generate_project_id, ApiError, AppState, Validator};
use crate::projects::handlers::public::load_project_response;
use crate::projects::models::*;
use crate::projects::tags::suggest_tag;
use crate::projects::validators::ProjectValidator;

/// POST /api/projects - Create a project
pub async fn create_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = ProjectValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let project_id = generate_project_id();
    let tags = normalized_tags(&request.tags);

    // Project row and its tag relations change together
    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query(
        r#"
        INSERT INTO projects (id, user_id, title, description, category)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&project_id)
    .bind(authed.id())
    .bind(request.title.trim())
    .bind(&request.description)
    .bind(&request.category)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id(), "Database error creating project");
        ApiError::DatabaseError(e)
    })?;

    for tag in &tags {
        sqlx::query("INSERT OR IGNORE INTO project_tags (project_id, tag) VALUES (?, ?)")
            .bind(&project_id)
            .bind(tag)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;
    }

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.id(),
        project_id = %project_id,
        tag_count = tags.len(),
        "Project created successfully"
    );

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&project_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(
        load_project_response(&state.db, project, Some(authed.id())).await?,
    ))
}

/// PUT /api/projects/:id - Update an owned project
pub async fn update_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = ProjectValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let owner_id = project_owner(&state.db, &project_id).await?;
    require_owner(&owner_id, authed.id()).map_err(|e| {
        warn!(
            user_id = %authed.id(),
            project_id = %project_id,
            "Project update denied: caller does not own the project"
        );
        e
    })?;

    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query(
        r#"
        UPDATE projects
        SET title = COALESCE(?, title),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.description.as_deref())
    .bind(request.category.as_deref())
    .bind(&project_id)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    // Tag relations are replaced wholesale when provided
    if let Some(tags) = &request.tags {
        sqlx::query("DELETE FROM project_tags WHERE project_id = ?")
            .bind(&project_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        for tag in normalized_tags(tags) {
            sqlx::query("INSERT OR IGNORE INTO project_tags (project_id, tag) VALUES (?, ?)")
                .bind(&project_id)
                .bind(&tag)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;
        }
    }

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id(), project_id = %project_id, "Project updated successfully");

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&project_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(
        load_project_response(&state.db, project, Some(authed.id())).await?,
    ))
}

/// DELETE /api/projects/:id - Delete an owned project
pub async fn delete_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = project_owner(&state.db, &project_id).await?;
    require_owner(&owner_id, authed.id()).map_err(|e| {
        warn!(
            user_id = %authed.id(),
            project_id = %project_id,
            "Project deletion denied: caller does not own the project"
        );
        e
    })?;

    remove_project_assets(&state, &project_id).await;

    // Screenshot/tag/like/comment rows cascade with the project row
    sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(&project_id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, project_id = %project_id, "Database error deleting project");
            ApiError::DatabaseError(e)
        })?;

    info!(user_id = %authed.id(), project_id = %project_id, "Project deleted successfully");

    Ok(StatusCode::NO_CONTENT)
}

/// Load the owning user id or fail with NotFound
pub(crate) async fn project_owner(
    db: &sqlx::SqlitePool,
    project_id: &str,
) -> Result<String, ApiError> {
    sqlx::query_scalar::<_, String>("SELECT user_id FROM projects WHERE id = ?")
        .bind(project_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound(format!("Project not found: {}", project_id)))
}

/// Remove stored screenshot blobs for a project; storage failures are logged,
/// never fatal to the delete
pub(crate) async fn remove_project_assets(state: &AppState, project_id: &str) {
    let urls: Vec<String> = match sqlx::query_scalar(
        "SELECT url FROM project_screenshots WHERE project_id = ?",
    )
    .bind(project_id)
    .fetch_all(&state.db)
    .await
    {
        Ok(urls) => urls,
        Err(e) => {
            warn!(error = %e, project_id = %project_id, "Failed to list screenshots for cleanup");
            return;
        }
    };

    let keys: Vec<String> = urls
        .iter()
        .filter_map(|url| url.split("/uploads/").nth(1).map(str::to_string))
        .collect();

    if keys.is_empty() {
        return;
    }

    if let Err(e) = state.storage.remove(&keys).await {
        warn!(error = %e, project_id = %project_id, "Failed to remove screenshot objects");
    }
}

fn normalized_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = tags.iter().filter_map(|t| suggest_tag(t)).collect();
    normalized.sort();
    normalized.dedup();
    normalized
}
