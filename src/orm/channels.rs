//! SeaORM Entity for channels table

use crate::storage::StorageBackend;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Channel category, stored as a two letter code
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(2))")]
pub enum Category {
    /// No category picked
    #[sea_orm(string_value = "")]
    #[default]
    Unset,
    #[sea_orm(string_value = "ed")]
    Education,
    #[sea_orm(string_value = "tr")]
    Travel,
    #[sea_orm(string_value = "ga")]
    Game,
    #[sea_orm(string_value = "sh")]
    Shopping,
    #[sea_orm(string_value = "fi")]
    Fitness,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category: Category,
    pub name: String,
    pub user_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Storage path of the background image
    pub background_image: Option<String>,
    pub create_date: DateTime,
}

impl Model {
    /// URL of the background image, or `default` when none was uploaded.
    pub fn background_image_url(&self, storage: &dyn StorageBackend, default: &str) -> String {
        match self.background_image.as_deref() {
            Some(path) if !path.is_empty() => storage.url_for(path),
            _ => default.to_string(),
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::videos::Entity")]
    Videos,
    #[sea_orm(has_many = "super::channel_subscriptions::Entity")]
    Subscriptions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::channel_subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
