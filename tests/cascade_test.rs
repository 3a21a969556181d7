//! Cascading deletes across users, channels, videos and comment trees

mod common;

use common::fixtures::*;
use sea_orm::{EntityTrait, PaginatorTrait};
use vod::orm::{channel_subscriptions, comment_likes, comments, video_likes, videos};
use vod::VodError;

#[actix_rt::test]
async fn test_delete_channel_removes_videos_comments_and_replies() {
    let (store, _storage) = test_store().await;

    let owner = create_test_user(&store, "owner").await;
    let viewer = create_test_user(&store, "viewer").await;
    let channel = create_test_channel(&store, owner.id, "Travel diaries").await;
    let first = create_test_video(&store, channel.id, "Lisbon").await;
    let second = create_test_video(&store, channel.id, "Porto").await;

    let root = create_test_comment(&store, viewer.id, first.id, "Beautiful", None).await;
    let reply = create_test_comment(&store, owner.id, first.id, "Thanks!", Some(root.id)).await;
    let nested = create_test_comment(&store, viewer.id, first.id, "np", Some(reply.id)).await;
    let other = create_test_comment(&store, viewer.id, second.id, "Next?", None).await;

    store.like_video(viewer.id, first.id).await.unwrap();
    store.like_comment(owner.id, nested.id).await.unwrap();
    store.subscribe(viewer.id, channel.id).await.unwrap();

    let summary = store.delete_channel(channel.id).await.unwrap();
    assert_eq!(summary.channels, 1);
    assert_eq!(summary.videos, 2);
    assert_eq!(summary.comments, 4);
    assert!(summary.cleanup_failures.is_empty());

    for id in [root.id, reply.id, nested.id, other.id] {
        assert!(matches!(
            store.get_comment(id).await,
            Err(VodError::NotFound { .. })
        ));
    }
    assert!(store.get_video(first.id).await.is_err());
    assert!(store.get_video(second.id).await.is_err());
    assert!(store.get_channel(channel.id).await.is_err());

    let db = store.db();
    assert_eq!(video_likes::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(comment_likes::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(channel_subscriptions::Entity::find().count(db).await.unwrap(), 0);

    // The users themselves are untouched
    assert!(store.get_user(owner.id).await.is_ok());
    assert!(store.get_user(viewer.id).await.is_ok());
}

#[actix_rt::test]
async fn test_delete_channel_leaves_other_channels_alone() {
    let (store, _storage) = test_store().await;

    let owner = create_test_user(&store, "owner").await;
    let doomed = create_test_channel(&store, owner.id, "Doomed").await;
    let kept = create_test_channel(&store, owner.id, "Kept").await;
    create_test_video(&store, doomed.id, "Gone").await;
    let survivor = create_test_video(&store, kept.id, "Stays").await;
    let comment = create_test_comment(&store, owner.id, survivor.id, "still here", None).await;

    store.delete_channel(doomed.id).await.unwrap();

    assert_eq!(store.list_channels().await.unwrap(), vec![kept]);
    assert!(store.get_video(survivor.id).await.is_ok());
    assert!(store.get_comment(comment.id).await.is_ok());
}

#[actix_rt::test]
async fn test_delete_comment_removes_reply_subtree_only() {
    let (store, _storage) = test_store().await;

    let user = create_test_user(&store, "talker").await;
    let channel = create_test_channel(&store, user.id, "Talk").await;
    let video = create_test_video(&store, channel.id, "Episode 1").await;

    let root = create_test_comment(&store, user.id, video.id, "root", None).await;
    let child = create_test_comment(&store, user.id, video.id, "child", Some(root.id)).await;
    let grandchild = create_test_comment(&store, user.id, video.id, "grandchild", Some(child.id)).await;
    let sibling = create_test_comment(&store, user.id, video.id, "sibling", Some(root.id)).await;
    let unrelated = create_test_comment(&store, user.id, video.id, "unrelated", None).await;

    let summary = store.delete_comment(child.id).await.unwrap();
    assert_eq!(summary.comments, 2);
    assert_eq!(summary.videos, 0);

    assert!(store.get_comment(child.id).await.is_err());
    assert!(store.get_comment(grandchild.id).await.is_err());
    assert!(store.get_comment(root.id).await.is_ok());
    assert!(store.get_comment(sibling.id).await.is_ok());
    assert!(store.get_comment(unrelated.id).await.is_ok());

    let replies = store.list_replies(root.id).await.unwrap();
    assert_eq!(replies, vec![sibling]);
}

#[actix_rt::test]
async fn test_delete_video_removes_its_comments() {
    let (store, _storage) = test_store().await;

    let user = create_test_user(&store, "uploader").await;
    let channel = create_test_channel(&store, user.id, "Games").await;
    let video = create_test_video(&store, channel.id, "Speedrun").await;
    let kept = create_test_video(&store, channel.id, "Highlights").await;
    let root = create_test_comment(&store, user.id, video.id, "wow", None).await;
    create_test_comment(&store, user.id, video.id, "indeed", Some(root.id)).await;
    create_test_comment(&store, user.id, kept.id, "nice", None).await;

    let summary = store.delete_video(video.id).await.unwrap();
    assert_eq!(summary.videos, 1);
    assert_eq!(summary.comments, 2);
    assert_eq!(summary.channels, 0);

    assert!(store.get_channel(channel.id).await.is_ok());
    assert_eq!(store.list_video_comments(kept.id).await.unwrap().len(), 1);
    assert_eq!(
        comments::Entity::find().count(store.db()).await.unwrap(),
        1
    );
}

#[actix_rt::test]
async fn test_delete_user_cascades_to_channels_and_comments() {
    let (store, _storage) = test_store().await;

    let leaving = create_test_user(&store, "leaving").await;
    let staying = create_test_user(&store, "staying").await;

    let own_channel = create_test_channel(&store, leaving.id, "Mine").await;
    let own_video = create_test_video(&store, own_channel.id, "My video").await;
    create_test_comment(&store, staying.id, own_video.id, "on their video", None).await;

    let other_channel = create_test_channel(&store, staying.id, "Theirs").await;
    let other_video = create_test_video(&store, other_channel.id, "Their video").await;
    let staying_root = create_test_comment(&store, staying.id, other_video.id, "hello", None).await;
    let leaving_reply =
        create_test_comment(&store, leaving.id, other_video.id, "hi", Some(staying_root.id)).await;
    let answer =
        create_test_comment(&store, staying.id, other_video.id, "bye", Some(leaving_reply.id)).await;

    store.subscribe(leaving.id, other_channel.id).await.unwrap();
    store.like_video(leaving.id, other_video.id).await.unwrap();

    let summary = store.delete_user(leaving.id).await.unwrap();
    assert_eq!(summary.users, 1);
    assert_eq!(summary.channels, 1);
    assert_eq!(summary.videos, 1);
    // comment on the deleted video, the user's reply, and the answer to it
    assert_eq!(summary.comments, 3);

    assert!(store.get_user(leaving.id).await.is_err());
    assert!(store.get_comment(leaving_reply.id).await.is_err());
    assert!(store.get_comment(answer.id).await.is_err());
    assert!(store.get_comment(staying_root.id).await.is_ok());
    assert_eq!(store.subscriber_count(other_channel.id).await.unwrap(), 0);
    assert_eq!(store.video_like_count(other_video.id).await.unwrap(), 0);
    assert_eq!(videos::Entity::find().count(store.db()).await.unwrap(), 1);
}

#[actix_rt::test]
async fn test_delete_missing_records_is_not_found() {
    let (store, storage) = test_store().await;

    assert!(matches!(
        store.delete_channel(404).await,
        Err(VodError::NotFound {
            entity: "Channel",
            id: 404
        })
    ));
    assert!(matches!(
        store.delete_video(404).await,
        Err(VodError::NotFound { entity: "Video", .. })
    ));
    assert!(matches!(
        store.delete_comment(404).await,
        Err(VodError::NotFound { entity: "Comment", .. })
    ));
    assert!(matches!(
        store.delete_user(404).await,
        Err(VodError::NotFound { entity: "User", .. })
    ));
    assert!(storage.deleted().is_empty());
}
