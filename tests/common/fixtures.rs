//! Test fixtures for creating test data
#![allow(dead_code)]

use super::database::setup_test_database;
use super::storage::RecordingStorage;
use std::sync::Arc;
use vod::app_config::MediaConfig;
use vod::orm::{channels, comments, users, videos};
use vod::store::{NewChannel, NewComment, NewVideo};
use vod::VodStore;

/// A store over a fresh database and a recording storage backend.
pub async fn test_store() -> (VodStore, Arc<RecordingStorage>) {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");
    let storage = Arc::new(RecordingStorage::default());
    let store = VodStore::new(db, storage.clone(), MediaConfig::default());
    (store, storage)
}

pub async fn create_test_user(store: &VodStore, name: &str) -> users::Model {
    store
        .create_user(name)
        .await
        .expect("Failed to create user")
}

pub async fn create_test_channel(store: &VodStore, user_id: i32, name: &str) -> channels::Model {
    store
        .create_channel(NewChannel {
            user_id,
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create channel")
}

pub async fn create_test_video(store: &VodStore, channel_id: i32, title: &str) -> videos::Model {
    store
        .create_video(NewVideo {
            channel_id,
            title: title.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create video")
}

pub async fn create_test_comment(
    store: &VodStore,
    user_id: i32,
    video_id: i32,
    content: &str,
    reply_to: Option<i32>,
) -> comments::Model {
    store
        .create_comment(NewComment {
            user_id,
            video_id,
            content: content.to_string(),
            reply_to,
        })
        .await
        .expect("Failed to create comment")
}
