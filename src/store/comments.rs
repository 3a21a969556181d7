//! Comment operations.

use super::cascade::CascadeRoot;
use super::{not_blank, now, touched, DeletionSummary, VodStore};
use crate::error::{VodError, VodResult};
use crate::orm::{comments, users, videos};
use sea_orm::{entity::*, query::*, ActiveValue::Set};
use validator::Validate;

/// Fields for a new comment.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewComment {
    pub user_id: i32,
    pub video_id: i32,
    #[validate(length(min = 1, max = 1000), custom = "not_blank")]
    pub content: String,
    /// Parent comment; it must belong to the same video
    pub reply_to: Option<i32>,
}

/// Changes to an existing comment.
#[derive(Debug, Clone, Default, Validate)]
pub struct CommentChanges {
    #[validate(length(min = 1, max = 1000), custom = "not_blank")]
    pub content: Option<String>,
}

impl VodStore {
    pub async fn create_comment(&self, new: NewComment) -> VodResult<comments::Model> {
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
        if videos::Entity::find_by_id(new.video_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(VodError::validation(format!(
                "video {} does not exist",
                new.video_id
            )));
        }
        if let Some(parent_id) = new.reply_to {
            match comments::Entity::find_by_id(parent_id).one(&self.db).await? {
                Some(parent) if parent.video_id == new.video_id => {}
                Some(_) => {
                    return Err(VodError::validation(format!(
                        "comment {} belongs to another video",
                        parent_id
                    )))
                }
                None => {
                    return Err(VodError::validation(format!(
                        "comment {} does not exist",
                        parent_id
                    )))
                }
            }
        }

        let created = now();
        let comment = comments::ActiveModel {
            user_id: Set(new.user_id),
            video_id: Set(new.video_id),
            content: Set(new.content),
            create_date: Set(created),
            update_date: Set(created),
            reply_id: Set(new.reply_to),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(comment)
    }

    pub async fn get_comment(&self, id: i32) -> VodResult<comments::Model> {
        comments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VodError::not_found("Comment", id))
    }

    pub async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> VodResult<comments::Model> {
        changes.validate()?;

        let current = self.get_comment(id).await?;
        let update_date = touched(current.update_date);

        let mut comment: comments::ActiveModel = current.into();
        if let Some(content) = changes.content {
            comment.content = Set(content);
        }
        comment.update_date = Set(update_date);

        Ok(comment.update(&self.db).await?)
    }

    /// Delete a comment and every reply beneath it.
    pub async fn delete_comment(&self, id: i32) -> VodResult<DeletionSummary> {
        self.delete_cascade(CascadeRoot::Comment(id)).await
    }

    /// Comments on a video in the order they were written.
    pub async fn list_video_comments(&self, video_id: i32) -> VodResult<Vec<comments::Model>> {
        Ok(comments::Entity::find()
            .filter(comments::Column::VideoId.eq(video_id))
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Direct replies to a comment.
    pub async fn list_replies(&self, comment_id: i32) -> VodResult<Vec<comments::Model>> {
        Ok(comments::Entity::find()
            .filter(comments::Column::ReplyId.eq(comment_id))
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await?)
    }
}
