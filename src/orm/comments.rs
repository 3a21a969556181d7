//! SeaORM Entity for comments table
//!
//! Comments form a tree through `reply_id`; a reply points at its parent.

use sea_orm::entity::prelude::*;

/// Number of characters kept by [`Model::short_content`].
pub const SHORT_CONTENT_CHARS: usize = 70;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub video_id: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub create_date: DateTime,
    pub update_date: DateTime,
    /// Parent comment when this is a reply
    pub reply_id: Option<i32>,
}

impl Model {
    /// First 70 characters of the content, cut without regard for words.
    pub fn short_content(&self) -> &str {
        match self.content.char_indices().nth(SHORT_CONTENT_CHARS) {
            Some((end, _)) => &self.content[..end],
            None => &self.content,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_content())
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
    Author,
    #[sea_orm(
        belongs_to = "super::videos::Entity",
        from = "Column::VideoId",
        to = "super::videos::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Video,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ReplyId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(has_many = "super::comment_likes::Entity")]
    Likes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl Related<super::comment_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
