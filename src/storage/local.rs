//! Local filesystem storage backend.

use super::{check_relative_path, join_url, StorageBackend, StorageError};
use actix_web::web;
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

/// Local filesystem storage backend.
pub struct LocalStorage {
    /// Base path for file storage
    base_path: PathBuf,
    /// URL prefix the base path is served under, e.g. `/media/`
    media_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    ///
    /// The `base_path` directory will be created if it doesn't exist.
    pub fn new(base_path: PathBuf, media_url: String) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path)?;
        log::info!("LocalStorage initialized at {:?}", base_path);
        Ok(Self {
            base_path,
            media_url,
        })
    }

    /// Get the full path for a stored file.
    fn get_file_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        check_relative_path(path)?;
        Ok(self.base_path.join(path))
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn put_object(&self, data: Vec<u8>, path: &str) -> Result<(), StorageError> {
        let path = self.get_file_path(path)?;
        log::info!("LocalStorage: put_object: {:?}", path);

        // Use web::block for blocking file operations
        web::block(move || {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, data)
        })
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        Ok(())
    }

    async fn delete_object(&self, path: &str) -> Result<(), StorageError> {
        let path = self.get_file_path(path)?;
        log::debug!("LocalStorage: delete_object: {:?}", path);

        web::block(move || fs::remove_file(&path))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;

        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = self.get_file_path(path)?;
        log::debug!("LocalStorage: exists: {:?}", path);

        web::block(move || path.exists())
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))
    }

    fn url_for(&self, path: &str) -> String {
        join_url(&self.media_url, path)
    }
}
