//! User records. Identity is managed elsewhere; these rows anchor ownership.

use super::cascade::CascadeRoot;
use super::{now, DeletionSummary, VodStore};
use crate::error::{VodError, VodResult};
use crate::orm::users;
use sea_orm::{entity::*, ActiveValue::Set};

impl VodStore {
    pub async fn create_user(&self, name: &str) -> VodResult<users::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VodError::validation("user name is required"));
        }

        let user = users::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now()),
            ..Default::default() // all other attributes are `Unset`
        }
        .insert(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, id: i32) -> VodResult<users::Model> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VodError::not_found("User", id))
    }

    /// Delete a user with their channels, comments, subscriptions and likes.
    pub async fn delete_user(&self, id: i32) -> VodResult<DeletionSummary> {
        self.delete_cascade(CascadeRoot::User(id)).await
    }
}
