//! Entity store for channels, videos and comments.
//!
//! All writes go through [`VodStore`]. Deletes cascade to every dependent row in a
//! single transaction; once it commits, the store hands each removed Channel and
//! Video to its [`CleanupHandler`] so stored media is removed as well.

mod cascade;
pub mod channels;
pub mod comments;
pub mod social;
pub mod users;
pub mod videos;

pub use self::channels::{ChannelChanges, NewChannel};
pub use self::comments::{CommentChanges, NewComment};
pub use self::videos::{NewVideo, VideoChanges};

use crate::app_config::MediaConfig;
use crate::cleanup::{CleanupFailure, CleanupHandler, StorageCleanup};
use crate::error::VodResult;
use crate::storage::{numbered_path, upload_path, StorageBackend};
use cascade::{CascadePlan, CascadeRoot};
use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use validator::ValidationError;

/// Outcome of a delete, including everything removed by cascade.
#[derive(Debug, Default)]
pub struct DeletionSummary {
    pub users: usize,
    pub channels: usize,
    pub videos: usize,
    pub comments: usize,
    /// Media files that could not be removed; the rows are gone regardless
    pub cleanup_failures: Vec<CleanupFailure>,
}

/// Persistent store for the video-on-demand data model.
pub struct VodStore {
    db: DatabaseConnection,
    storage: Arc<dyn StorageBackend>,
    cleanup: Arc<dyn CleanupHandler>,
    media: MediaConfig,
}

impl VodStore {
    /// Create a store whose deletes remove media from `storage`.
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageBackend>, media: MediaConfig) -> Self {
        let cleanup = Arc::new(StorageCleanup::new(storage.clone()));
        Self::with_cleanup(db, storage, cleanup, media)
    }

    /// Create a store with a custom post-delete handler.
    pub fn with_cleanup(
        db: DatabaseConnection,
        storage: Arc<dyn StorageBackend>,
        cleanup: Arc<dyn CleanupHandler>,
        media: MediaConfig,
    ) -> Self {
        Self {
            db,
            storage,
            cleanup,
            media,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Store an upload under `dir` at a dated path no other file occupies.
    async fn put_upload(&self, dir: &str, file_name: &str, data: Vec<u8>) -> VodResult<String> {
        let base = upload_path(dir, file_name, now().date())?;
        let mut path = base.clone();
        let mut n = 0;
        while self.storage.exists(&path).await? {
            n += 1;
            path = numbered_path(&base, n);
        }

        self.storage.put_object(data, &path).await?;
        Ok(path)
    }

    /// Remove an upload whose record could not be pointed at it.
    async fn discard_upload(&self, path: &str) {
        if let Err(e) = self.storage.delete_object(path).await {
            log::error!("Failed to remove orphaned upload {}: {}", path, e);
        }
    }

    /// Collect a cascade inside one transaction, delete it, then run cleanup.
    async fn delete_cascade(&self, root: CascadeRoot) -> VodResult<DeletionSummary> {
        let txn = self.db.begin().await?;
        let mut plan = CascadePlan::default();
        plan.add_root(&txn, root).await?;
        plan.execute(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Deleted {} user(s), {} channel(s), {} video(s), {} comment(s)",
            plan.users.len(),
            plan.channels.len(),
            plan.videos.len(),
            plan.comments.len()
        );

        let mut summary = DeletionSummary {
            users: plan.users.len(),
            channels: plan.channels.len(),
            videos: plan.videos.len(),
            comments: plan.comments.len(),
            cleanup_failures: Vec::new(),
        };

        for video in &plan.videos {
            if let Err(failure) = self.cleanup.video_deleted(video).await {
                log::error!("Media cleanup failed: {}", failure);
                summary.cleanup_failures.push(failure);
            }
        }
        for channel in &plan.channels {
            if let Err(failure) = self.cleanup.channel_deleted(channel).await {
                log::error!("Media cleanup failed: {}", failure);
                summary.cleanup_failures.push(failure);
            }
        }

        Ok(summary)
    }
}

/// Current time as stored in timestamp columns.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// A fresh last-update timestamp, strictly later than `previous`.
pub(crate) fn touched(previous: NaiveDateTime) -> NaiveDateTime {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Treat blank optional text as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validator for required text fields.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touched_is_strictly_later() {
        let future = now() + Duration::seconds(5);
        assert!(touched(future) > future);

        let past = now() - Duration::seconds(5);
        assert!(touched(past) > past);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("hi".to_string())), Some("hi".to_string()));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("name").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t").is_err());
    }
}
