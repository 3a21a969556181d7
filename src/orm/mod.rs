//! SeaORM entities for the video-on-demand data model.

pub mod channel_subscriptions;
pub mod channels;
pub mod comment_likes;
pub mod comments;
pub mod users;
pub mod video_likes;
pub mod videos;
