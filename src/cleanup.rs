//! Post-delete cleanup of stored media.
//!
//! The store calls a [`CleanupHandler`] once for every Channel and Video row it
//! removes, after the deleting transaction has committed. A failed cleanup never
//! brings the row back; the store logs it and reports it in the deletion summary.

use crate::orm::{channels, videos};
use crate::storage::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::sync::Arc;

/// A media file that could not be removed after its record was deleted.
#[derive(Debug)]
pub struct CleanupFailure {
    pub entity: &'static str,
    pub id: i32,
    pub path: String,
    pub error: StorageError,
}

impl std::fmt::Display for CleanupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to delete {} for {} {}: {}",
            self.path, self.entity, self.id, self.error
        )
    }
}

impl std::error::Error for CleanupFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Receives the values of deleted records that may own stored media.
#[async_trait]
pub trait CleanupHandler: Send + Sync {
    async fn channel_deleted(&self, channel: &channels::Model) -> Result<(), CleanupFailure>;

    async fn video_deleted(&self, video: &videos::Model) -> Result<(), CleanupFailure>;
}

/// Deletes background images and video files from a storage backend.
pub struct StorageCleanup {
    storage: Arc<dyn StorageBackend>,
}

impl StorageCleanup {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    async fn delete_file(
        &self,
        entity: &'static str,
        id: i32,
        path: Option<&str>,
    ) -> Result<(), CleanupFailure> {
        let path = match path {
            Some(path) if !path.is_empty() => path,
            _ => return Ok(()),
        };

        log::debug!("Deleting {} file of {} {}", path, entity, id);
        self.storage
            .delete_object(path)
            .await
            .map_err(|error| CleanupFailure {
                entity,
                id,
                path: path.to_string(),
                error,
            })
    }
}

#[async_trait]
impl CleanupHandler for StorageCleanup {
    async fn channel_deleted(&self, channel: &channels::Model) -> Result<(), CleanupFailure> {
        self.delete_file("Channel", channel.id, channel.background_image.as_deref())
            .await
    }

    async fn video_deleted(&self, video: &videos::Model) -> Result<(), CleanupFailure> {
        self.delete_file("Video", video.id, video.video.as_deref())
            .await
    }
}
