//! Channel operations.

use super::cascade::CascadeRoot;
use super::{non_blank, not_blank, now, DeletionSummary, VodStore};
use crate::error::{VodError, VodResult};
use crate::orm::channels::{self, Category};
use crate::orm::users;
use sea_orm::{entity::*, query::*, ActiveValue::Set};
use validator::Validate;

/// Fields for a new channel.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewChannel {
    pub user_id: i32,
    pub category: Category,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Changes to an existing channel. `None` leaves a field untouched; a blank
/// description clears it.
#[derive(Debug, Clone, Default, Validate)]
pub struct ChannelChanges {
    pub category: Option<Category>,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl VodStore {
    pub async fn create_channel(&self, new: NewChannel) -> VodResult<channels::Model> {
        new.validate()?;

        if users::Entity::find_by_id(new.user_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(VodError::validation(format!(
                "user {} does not exist",
                new.user_id
            )));
        }

        let channel = channels::ActiveModel {
            category: Set(new.category),
            name: Set(new.name),
            user_id: Set(new.user_id),
            description: Set(non_blank(new.description)),
            background_image: Set(None),
            create_date: Set(now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        log::info!("Created channel {} for user {}", channel.id, channel.user_id);
        Ok(channel)
    }

    pub async fn get_channel(&self, id: i32) -> VodResult<channels::Model> {
        channels::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VodError::not_found("Channel", id))
    }

    pub async fn update_channel(
        &self,
        id: i32,
        changes: ChannelChanges,
    ) -> VodResult<channels::Model> {
        changes.validate()?;

        let current = self.get_channel(id).await?;
        if changes.category.is_none() && changes.name.is_none() && changes.description.is_none() {
            return Ok(current);
        }

        let mut channel: channels::ActiveModel = current.into();
        if let Some(category) = changes.category {
            channel.category = Set(category);
        }
        if let Some(name) = changes.name {
            channel.name = Set(name);
        }
        if let Some(description) = changes.description {
            channel.description = Set(non_blank(Some(description)));
        }

        Ok(channel.update(&self.db).await?)
    }

    /// Delete a channel with its videos and their comments.
    pub async fn delete_channel(&self, id: i32) -> VodResult<DeletionSummary> {
        self.delete_cascade(CascadeRoot::Channel(id)).await
    }

    /// All channels, newest first.
    pub async fn list_channels(&self) -> VodResult<Vec<channels::Model>> {
        Ok(channels::Entity::find()
            .order_by_desc(channels::Column::CreateDate)
            .order_by_desc(channels::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Channels owned by a user, newest first.
    pub async fn list_user_channels(&self, user_id: i32) -> VodResult<Vec<channels::Model>> {
        Ok(channels::Entity::find()
            .filter(channels::Column::UserId.eq(user_id))
            .order_by_desc(channels::Column::CreateDate)
            .order_by_desc(channels::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Store an uploaded background image and point the channel at it.
    ///
    /// A previously stored image is left in place.
    pub async fn set_channel_background_image(
        &self,
        id: i32,
        file_name: &str,
        data: Vec<u8>,
    ) -> VodResult<channels::Model> {
        let channel = self.get_channel(id).await?;
        let path = self
            .put_upload(&self.media.background_image_dir, file_name, data)
            .await?;

        let mut channel: channels::ActiveModel = channel.into();
        channel.background_image = Set(Some(path.clone()));
        match channel.update(&self.db).await {
            Ok(channel) => Ok(channel),
            Err(e) => {
                self.discard_upload(&path).await;
                Err(e.into())
            }
        }
    }

    /// URL of the channel's background image, or the configured default.
    pub fn background_image_url(&self, channel: &channels::Model) -> String {
        channel.background_image_url(self.storage.as_ref(), &self.media.default_background_image)
    }
}
