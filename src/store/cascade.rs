//! Cascade planning for deletes.
//!
//! Every dependent row is collected inside the deleting transaction, then removed
//! children first. Reply trees are walked level by level instead of relying on
//! the database to follow the self reference.

use crate::orm::{
    channel_subscriptions, channels, comment_likes, comments, users, video_likes, videos,
};
use crate::error::{VodError, VodResult};
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr};
use std::collections::HashSet;

/// The row a delete was requested for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CascadeRoot {
    User(i32),
    Channel(i32),
    Video(i32),
    Comment(i32),
}

/// Rows removed by one delete operation.
#[derive(Debug, Default)]
pub(crate) struct CascadePlan {
    pub users: Vec<i32>,
    pub channels: Vec<channels::Model>,
    pub videos: Vec<videos::Model>,
    pub comments: Vec<i32>,
}

impl CascadePlan {
    /// Load the requested row and everything depending on it.
    pub async fn add_root<C>(&mut self, db: &C, root: CascadeRoot) -> VodResult<()>
    where
        C: ConnectionTrait,
    {
        match root {
            CascadeRoot::User(id) => {
                users::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| VodError::not_found("User", id))?;
                self.add_user(db, id).await?;
            }
            CascadeRoot::Channel(id) => {
                let channel = channels::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| VodError::not_found("Channel", id))?;
                self.add_channels(db, vec![channel]).await?;
            }
            CascadeRoot::Video(id) => {
                let video = videos::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| VodError::not_found("Video", id))?;
                self.add_videos(db, vec![video]).await?;
            }
            CascadeRoot::Comment(id) => {
                comments::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| VodError::not_found("Comment", id))?;
                self.add_comment_trees(db, vec![id]).await?;
            }
        }
        Ok(())
    }

    /// A user, with their channels and every comment they wrote.
    pub async fn add_user<C>(&mut self, db: &C, user_id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        self.users.push(user_id);

        let owned = channels::Entity::find()
            .filter(channels::Column::UserId.eq(user_id))
            .all(db)
            .await?;
        self.add_channels(db, owned).await?;

        let written: Vec<i32> = comments::Entity::find()
            .filter(comments::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        self.add_comment_trees(db, written).await
    }

    /// Channels with their videos.
    pub async fn add_channels<C>(
        &mut self,
        db: &C,
        channels: Vec<channels::Model>,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if channels.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = channels.iter().map(|c| c.id).collect();
        let videos = videos::Entity::find()
            .filter(videos::Column::ChannelId.is_in(ids))
            .all(db)
            .await?;

        self.channels.extend(channels);
        self.add_videos(db, videos).await
    }

    /// Videos with their comments.
    pub async fn add_videos<C>(&mut self, db: &C, videos: Vec<videos::Model>) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if videos.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = videos.iter().map(|v| v.id).collect();
        let roots: Vec<i32> = comments::Entity::find()
            .filter(comments::Column::VideoId.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        self.videos.extend(videos);
        self.add_comment_trees(db, roots).await
    }

    /// Comments with every reply beneath them.
    pub async fn add_comment_trees<C>(&mut self, db: &C, roots: Vec<i32>) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let mut seen: HashSet<i32> = self.comments.iter().copied().collect();
        let mut frontier: Vec<i32> = roots.into_iter().filter(|id| seen.insert(*id)).collect();

        while !frontier.is_empty() {
            self.comments.extend(frontier.iter().copied());

            frontier = comments::Entity::find()
                .filter(comments::Column::ReplyId.is_in(frontier))
                .all(db)
                .await?
                .into_iter()
                .map(|c| c.id)
                .filter(|id| seen.insert(*id))
                .collect();
        }

        Ok(())
    }

    /// Delete everything in the plan, dependents before the rows they point at.
    pub async fn execute<C>(&self, db: &C) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if !self.comments.is_empty() {
            comment_likes::Entity::delete_many()
                .filter(comment_likes::Column::CommentId.is_in(self.comments.clone()))
                .exec(db)
                .await?;
            comments::Entity::delete_many()
                .filter(comments::Column::Id.is_in(self.comments.clone()))
                .exec(db)
                .await?;
        }

        if !self.videos.is_empty() {
            let ids: Vec<i32> = self.videos.iter().map(|v| v.id).collect();
            video_likes::Entity::delete_many()
                .filter(video_likes::Column::VideoId.is_in(ids.clone()))
                .exec(db)
                .await?;
            videos::Entity::delete_many()
                .filter(videos::Column::Id.is_in(ids))
                .exec(db)
                .await?;
        }

        if !self.channels.is_empty() {
            let ids: Vec<i32> = self.channels.iter().map(|c| c.id).collect();
            channel_subscriptions::Entity::delete_many()
                .filter(channel_subscriptions::Column::ChannelId.is_in(ids.clone()))
                .exec(db)
                .await?;
            channels::Entity::delete_many()
                .filter(channels::Column::Id.is_in(ids))
                .exec(db)
                .await?;
        }

        if !self.users.is_empty() {
            comment_likes::Entity::delete_many()
                .filter(comment_likes::Column::UserId.is_in(self.users.clone()))
                .exec(db)
                .await?;
            video_likes::Entity::delete_many()
                .filter(video_likes::Column::UserId.is_in(self.users.clone()))
                .exec(db)
                .await?;
            channel_subscriptions::Entity::delete_many()
                .filter(channel_subscriptions::Column::UserId.is_in(self.users.clone()))
                .exec(db)
                .await?;
            users::Entity::delete_many()
                .filter(users::Column::Id.is_in(self.users.clone()))
                .exec(db)
                .await?;
        }

        Ok(())
    }
}
