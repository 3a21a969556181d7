//! Subscriptions, likes, and the counts derived from them.
//!
//! Counts are queried on every call and never cached.

use super::{now, VodStore};
use crate::error::{VodError, VodResult};
use crate::orm::{channel_subscriptions, comment_likes, users, video_likes};
use sea_orm::{entity::*, query::*, ActiveValue::Set, PaginatorTrait};

impl VodStore {
    async fn require_user(&self, user_id: i32) -> VodResult<()> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| VodError::validation(format!("user {} does not exist", user_id)))
    }

    /// Subscribe a user to a channel. Returns false if already subscribed.
    pub async fn subscribe(&self, user_id: i32, channel_id: i32) -> VodResult<bool> {
        self.require_user(user_id).await?;
        self.get_channel(channel_id).await?;

        let existing = channel_subscriptions::Entity::find()
            .filter(channel_subscriptions::Column::UserId.eq(user_id))
            .filter(channel_subscriptions::Column::ChannelId.eq(channel_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        channel_subscriptions::ActiveModel {
            user_id: Set(user_id),
            channel_id: Set(channel_id),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(true)
    }

    /// Returns false if the user was not subscribed.
    pub async fn unsubscribe(&self, user_id: i32, channel_id: i32) -> VodResult<bool> {
        let result = channel_subscriptions::Entity::delete_many()
            .filter(channel_subscriptions::Column::UserId.eq(user_id))
            .filter(channel_subscriptions::Column::ChannelId.eq(channel_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Number of users subscribed to a channel.
    pub async fn subscriber_count(&self, channel_id: i32) -> VodResult<usize> {
        Ok(channel_subscriptions::Entity::find()
            .filter(channel_subscriptions::Column::ChannelId.eq(channel_id))
            .count(&self.db)
            .await?)
    }

    /// Like a video. Returns false if already liked.
    pub async fn like_video(&self, user_id: i32, video_id: i32) -> VodResult<bool> {
        self.require_user(user_id).await?;
        self.get_video(video_id).await?;

        let existing = video_likes::Entity::find()
            .filter(video_likes::Column::UserId.eq(user_id))
            .filter(video_likes::Column::VideoId.eq(video_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        video_likes::ActiveModel {
            user_id: Set(user_id),
            video_id: Set(video_id),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(true)
    }

    /// Returns false if the video was not liked by the user.
    pub async fn unlike_video(&self, user_id: i32, video_id: i32) -> VodResult<bool> {
        let result = video_likes::Entity::delete_many()
            .filter(video_likes::Column::UserId.eq(user_id))
            .filter(video_likes::Column::VideoId.eq(video_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn video_like_count(&self, video_id: i32) -> VodResult<usize> {
        Ok(video_likes::Entity::find()
            .filter(video_likes::Column::VideoId.eq(video_id))
            .count(&self.db)
            .await?)
    }

    /// Like a comment. Returns false if already liked.
    pub async fn like_comment(&self, user_id: i32, comment_id: i32) -> VodResult<bool> {
        self.require_user(user_id).await?;
        self.get_comment(comment_id).await?;

        let existing = comment_likes::Entity::find()
            .filter(comment_likes::Column::UserId.eq(user_id))
            .filter(comment_likes::Column::CommentId.eq(comment_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        comment_likes::ActiveModel {
            user_id: Set(user_id),
            comment_id: Set(comment_id),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(true)
    }

    /// Returns false if the comment was not liked by the user.
    pub async fn unlike_comment(&self, user_id: i32, comment_id: i32) -> VodResult<bool> {
        let result = comment_likes::Entity::delete_many()
            .filter(comment_likes::Column::UserId.eq(user_id))
            .filter(comment_likes::Column::CommentId.eq(comment_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn comment_like_count(&self, comment_id: i32) -> VodResult<usize> {
        Ok(comment_likes::Entity::find()
            .filter(comment_likes::Column::CommentId.eq(comment_id))
            .count(&self.db)
            .await?)
    }
}
