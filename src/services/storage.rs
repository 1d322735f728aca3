// src/services/storage.rs
//! Object storage for avatars and project screenshots
//!
//! Filesystem-backed store fronted by a public URL base. Keys follow
//! `{bucket}/{user_id}/{filename}` so per-user assets can be listed and
//! removed by prefix.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),
}

#[derive(Debug)]
pub struct StorageService {
    root: PathBuf,
    public_base_url: String,
}

impl StorageService {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the canonical `{bucket}/{user_id}/{filename}` key
    pub fn object_key(bucket: &str, user_id: &str, filename: &str) -> String {
        format!("{}/{}/{}", bucket, user_id, filename)
    }

    /// Store a blob under `key` and return its public URL
    pub async fn upload(&self, key: &str, data: &[u8]) -> Result<String, StorageError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;

        info!(key = %key, size = data.len(), "Stored object");
        Ok(self.public_url(key))
    }

    /// List object keys under a prefix (non-recursive beyond one level is
    /// enough for `{bucket}/{user_id}` prefixes)
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(prefix)?;

        let mut keys = Vec::new();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                let name = entry.file_name().to_string_lossy().to_string();
                keys.push(format!("{}/{}", prefix.trim_end_matches('/'), name));
            }
        }

        Ok(keys)
    }

    /// Public URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, key)
    }

    /// Remove a batch of objects; missing objects are not an error
    pub async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            let path = self.resolve(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(_) => debug!(key = %key, "Removed object"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        // Keys are server-generated, but reject traversal anyway
        if key.is_empty() || key.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(Path::new(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_format() {
        let key = StorageService::object_key("avatars", "U_ABC123", "photo.png");
        assert_eq!(key, "avatars/U_ABC123/photo.png");
    }

    #[test]
    fn test_public_url_joins_base() {
        let service = StorageService::new(
            PathBuf::from("/tmp/does-not-matter"),
            "https://vivvers.example".to_string(),
        );
        assert_eq!(
            service.public_url("avatars/U_ABC123/photo.png"),
            "https://vivvers.example/uploads/avatars/U_ABC123/photo.png"
        );
    }

    #[tokio::test]
    async fn test_upload_list_remove_round_trip() {
        let dir = std::env::temp_dir().join(format!("vivvers-storage-{}", std::process::id()));
        let service = StorageService::new(dir.clone(), "http://localhost:8080".to_string());

        let key = StorageService::object_key("screenshots", "U_TEST01", "shot.png");
        service.upload(&key, b"png-bytes").await.expect("upload failed");

        let listed = service
            .list("screenshots/U_TEST01")
            .await
            .expect("list failed");
        assert_eq!(listed, vec![key.clone()]);

        service.remove(&[key]).await.expect("remove failed");
        let listed = service
            .list("screenshots/U_TEST01")
            .await
            .expect("list failed");
        assert!(listed.is_empty());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[test]
    fn test_traversal_keys_rejected() {
        let service = StorageService::new(
            PathBuf::from("/tmp/root"),
            "http://localhost:8080".to_string(),
        );
        assert!(matches!(
            service.resolve("avatars/../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
