// src/projects/handlers/screenshots.rs

use axum::extract::{Extension, Multipart, Path};
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::manage::project_owner;
use crate::auth::{require_owner, AuthedUser};
use crate::common::{generate_screenshot_id, ApiError, AppState};
use crate::projects::models::{Screenshot, ScreenshotUploadResponse};
use crate::services::StorageService;
use crate::users::handlers::avatar::image_extension;

const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
const MAX_SCREENSHOTS: i64 = 8;

/// POST /api/projects/:id/screenshots - Upload project screenshots
///
/// Accepts one or more multipart `screenshot` fields. The caller must own
/// the project; the combined screenshot count is capped.
pub async fn upload_screenshots(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ScreenshotUploadResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let owner_id = project_owner(&state.db, &project_id).await?;
    require_owner(&owner_id, authed.id()).map_err(|e| {
        warn!(
            user_id = %authed.id(),
            project_id = %project_id,
            "Screenshot upload denied: caller does not own the project"
        );
        e
    })?;

    let mut existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM project_screenshots WHERE project_id = ?",
    )
    .bind(&project_id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        if field.name() != Some("screenshot") {
            continue;
        }

        if existing >= MAX_SCREENSHOTS {
            return Err(ApiError::BadRequest(format!(
                "At most {} screenshots are allowed per project",
                MAX_SCREENSHOTS
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;

        if data.len() > MAX_FILE_SIZE {
            return Err(ApiError::BadRequest(
                "File size exceeds 5MB limit".to_string(),
            ));
        }

        let extension = image_extension(&data).ok_or_else(|| {
            ApiError::BadRequest(
                "Invalid image type. Only JPEG, PNG, GIF, and WebP are supported".to_string(),
            )
        })?;

        let screenshot_id = generate_screenshot_id();
        let filename = format!("{}_{}.{}", project_id, screenshot_id, extension);
        let key = StorageService::object_key("screenshots", authed.id(), &filename);

        let url = state.storage.upload(&key, &data).await.map_err(|e| {
            error!(error = %e, project_id = %project_id, "Failed to store screenshot");
            ApiError::StorageError("Failed to store screenshot".to_string())
        })?;

        sqlx::query(
            "INSERT INTO project_screenshots (id, project_id, url, position) VALUES (?, ?, ?, ?)",
        )
        .bind(&screenshot_id)
        .bind(&project_id)
        .bind(&url)
        .bind(existing)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        stored.push(Screenshot {
            id: screenshot_id,
            project_id: project_id.clone(),
            url,
            position: existing,
        });

        existing += 1;
    }

    if stored.is_empty() {
        return Err(ApiError::BadRequest("No screenshot file found".to_string()));
    }

    info!(
        user_id = %authed.id(),
        project_id = %project_id,
        uploaded = stored.len(),
        "Screenshots uploaded successfully"
    );

    Ok(Json(ScreenshotUploadResponse {
        screenshots: stored,
        message: "Screenshots uploaded successfully".to_string(),
    }))
}
