//! Video operations.

use super::cascade::CascadeRoot;
use super::{non_blank, not_blank, now, touched, DeletionSummary, VodStore};
use crate::error::{VodError, VodResult};
use crate::orm::{channels, videos};
use sea_orm::{entity::*, query::*, ActiveValue::Set};
use url::Url;
use validator::{Validate, ValidationError};

/// Fields for a new video.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewVideo {
    pub channel_id: i32,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom = "external_url")]
    pub video_url: Option<String>,
}

/// Changes to an existing video. `None` leaves a field untouched; blank
/// optional text clears it.
#[derive(Debug, Clone, Default, Validate)]
pub struct VideoChanges {
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom = "external_url")]
    pub video_url: Option<String>,
}

/// Accept blank (meaning no URL) or an absolute http(s)/ftp URL.
fn external_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "ftp" | "ftps") && url.has_host() => {
            Ok(())
        }
        _ => Err(ValidationError::new("url")),
    }
}

impl VodStore {
    pub async fn create_video(&self, new: NewVideo) -> VodResult<videos::Model> {
        new.validate()?;

        if channels::Entity::find_by_id(new.channel_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(VodError::validation(format!(
                "channel {} does not exist",
                new.channel_id
            )));
        }

        let created = now();
        let video = videos::ActiveModel {
            channel_id: Set(new.channel_id),
            title: Set(new.title),
            description: Set(non_blank(new.description)),
            video: Set(None),
            video_url: Set(non_blank(new.video_url).map(|u| u.trim().to_string())),
            views: Set(0),
            create_date: Set(created),
            update_date: Set(created),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        log::info!("Created video {} in channel {}", video.id, video.channel_id);
        Ok(video)
    }

    pub async fn get_video(&self, id: i32) -> VodResult<videos::Model> {
        videos::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VodError::not_found("Video", id))
    }

    pub async fn update_video(&self, id: i32, changes: VideoChanges) -> VodResult<videos::Model> {
        changes.validate()?;

        let current = self.get_video(id).await?;
        let update_date = touched(current.update_date);

        let mut video: videos::ActiveModel = current.into();
        if let Some(title) = changes.title {
            video.title = Set(title);
        }
        if let Some(description) = changes.description {
            video.description = Set(non_blank(Some(description)));
        }
        if let Some(video_url) = changes.video_url {
            video.video_url = Set(non_blank(Some(video_url)).map(|u| u.trim().to_string()));
        }
        video.update_date = Set(update_date);

        Ok(video.update(&self.db).await?)
    }

    /// Count one view.
    pub async fn record_view(&self, id: i32) -> VodResult<videos::Model> {
        let current = self.get_video(id).await?;
        let views = current.views.saturating_add(1);
        let update_date = touched(current.update_date);

        let mut video: videos::ActiveModel = current.into();
        video.views = Set(views);
        video.update_date = Set(update_date);
        Ok(video.update(&self.db).await?)
    }

    /// Delete a video with its comments.
    pub async fn delete_video(&self, id: i32) -> VodResult<DeletionSummary> {
        self.delete_cascade(CascadeRoot::Video(id)).await
    }

    /// Videos of a channel, most recently updated first.
    pub async fn list_channel_videos(&self, channel_id: i32) -> VodResult<Vec<videos::Model>> {
        Ok(videos::Entity::find()
            .filter(videos::Column::ChannelId.eq(channel_id))
            .order_by_desc(videos::Column::UpdateDate)
            .order_by_desc(videos::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Store an uploaded video file and point the video at it.
    ///
    /// A previously stored file is left in place.
    pub async fn set_video_file(
        &self,
        id: i32,
        file_name: &str,
        data: Vec<u8>,
    ) -> VodResult<videos::Model> {
        let current = self.get_video(id).await?;
        let path = self.put_upload(&self.media.video_dir, file_name, data).await?;

        let update_date = touched(current.update_date);
        let mut video: videos::ActiveModel = current.into();
        video.video = Set(Some(path.clone()));
        video.update_date = Set(update_date);
        match video.update(&self.db).await {
            Ok(video) => Ok(video),
            Err(e) => {
                self.discard_upload(&path).await;
                Err(e.into())
            }
        }
    }
}
