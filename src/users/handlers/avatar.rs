// src/users/handlers/avatar.rs

use axum::extract::{Extension, Multipart};
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::super::models::AvatarUploadResponse;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::services::StorageService;

// File size limit: 5MB
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// POST /api/profile/avatar - Upload avatar
///
/// Accepts a multipart `avatar` field, sniffs the content type, stores the
/// blob under `avatars/{user_id}/` and updates the caller's own record.
pub async fn upload_avatar(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<Json<AvatarUploadResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(user_id = %authed.id(), "Avatar upload initiated");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        if field.name() == Some("avatar") {
            let filename = field
                .file_name()
                .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?
                .to_string();

            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;

            if data.len() > MAX_FILE_SIZE {
                return Err(ApiError::BadRequest(
                    "File size exceeds 5MB limit".to_string(),
                ));
            }

            let extension = match image_extension(&data) {
                Some(ext) => ext,
                None => {
                    return Err(ApiError::BadRequest(
                        "Invalid image type. Only JPEG, PNG, GIF, and WebP are supported"
                            .to_string(),
                    ))
                }
            };

            let stored_name = format!("avatar.{}", extension);
            let key = StorageService::object_key("avatars", authed.id(), &stored_name);

            // A previous avatar may live under another extension; clear the
            // whole prefix so exactly one object remains per user
            match state.storage.list(&format!("avatars/{}", authed.id())).await {
                Ok(stale) if !stale.is_empty() => {
                    if let Err(e) = state.storage.remove(&stale).await {
                        warn!(error = %e, user_id = %authed.id(), "Failed to remove old avatar");
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, user_id = %authed.id(), "Failed to list old avatars");
                }
            }

            let avatar_url = state.storage.upload(&key, &data).await.map_err(|e| {
                error!(error = %e, user_id = %authed.id(), "Failed to store avatar");
                ApiError::StorageError("Failed to store avatar".to_string())
            })?;

            sqlx::query(
                "UPDATE users SET avatar_url = ?, updated_at = datetime('now') WHERE id = ?",
            )
            .bind(&avatar_url)
            .bind(authed.id())
            .execute(&state.db)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %authed.id(), "Database error updating avatar url");
                ApiError::DatabaseError(e)
            })?;

            info!(
                user_id = %authed.id(),
                avatar_url = %avatar_url,
                original_filename = %filename,
                "Avatar uploaded successfully"
            );

            return Ok(Json(AvatarUploadResponse {
                avatar_url,
                message: "Avatar uploaded successfully".to_string(),
            }));
        }
    }

    Err(ApiError::BadRequest("No avatar file found".to_string()))
}

/// Sniff the image type from the blob's magic bytes
pub(crate) fn image_extension(data: &[u8]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    match kind.mime_type() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
