use std::sync::Arc;

use domains::{
    CommentEdit, DomainError, ImageSource, MediaUpload, NewComment, NewReply, NotificationKind,
};
use integration_tests::{TestApp, YieldingComments};
use storage_adapters::InMemoryCommentRepository;
use tokio_test::{assert_err, assert_ok};

fn draft(city: &str, user: &str, text: &str) -> NewComment {
    NewComment {
        city_name: city.into(),
        username: user.into(),
        comment: text.into(),
        image: None,
    }
}

#[tokio::test]
async fn like_reply_and_notification_round() {
    let app = TestApp::new();
    let (_, mut alice_socket) = app.push.subscribe("alice");

    let c = assert_ok!(app.comments.add(draft("Lisbon", "alice", "trams everywhere")).await);

    let liked = assert_ok!(app.comments.toggle_like(&c.id, "bob").await);
    assert_eq!(liked.likes_count, 1);
    assert!(liked.is_liked_by("bob"));

    let replied = assert_ok!(
        app.comments
            .add_reply(
                &c.id,
                NewReply {
                    username: "bob".into(),
                    text: "and hills".into(),
                },
            )
            .await
    );
    let reply_id = replied.replies[0].id.clone();

    let inbox = assert_ok!(app.notifications.list("alice").await);
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].kind, NotificationKind::Reply);
    assert_eq!(inbox[0].reply_id.as_deref(), Some(reply_id.as_str()));
    assert_eq!(inbox[1].kind, NotificationKind::Like);
    assert_eq!(inbox[1].message, "bob reacted to your comment");
    assert!(inbox.iter().all(|n| n.target_city == "Lisbon" && n.comment_id == c.id));

    // both were pushed to the open socket as well
    assert!(alice_socket.try_recv().is_ok());
    assert!(alice_socket.try_recv().is_ok());

    assert_eq!(assert_ok!(app.notifications.count_unread("alice").await), 2);
    assert_ok!(app.notifications.mark_read(&inbox[0].id).await);
    assert_eq!(assert_ok!(app.notifications.count_unread("alice").await), 1);
    assert_eq!(assert_ok!(app.notifications.mark_all_read("alice").await), 1);
    assert_eq!(assert_ok!(app.notifications.count_unread("alice").await), 0);
    assert_eq!(assert_ok!(app.notifications.mark_all_read("alice").await), 0);
}

#[tokio::test]
async fn toggling_twice_restores_the_comment() {
    let app = TestApp::new();
    let c = assert_ok!(app.comments.add(draft("Oslo", "alice", "fjords")).await);

    assert_ok!(app.comments.toggle_like(&c.id, "bob").await);
    let back = assert_ok!(app.comments.toggle_like(&c.id, "bob").await);

    assert_eq!(back.likes_count, 0);
    assert!(back.liked_by_users.is_empty());
    // one like notification; the unlike sends nothing
    assert_eq!(assert_ok!(app.notifications.list("alice").await).len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_are_all_counted() {
    let store = YieldingComments::new(InMemoryCommentRepository::new());
    let app = Arc::new(TestApp::with_comment_store(Arc::new(store)));
    let c = assert_ok!(app.comments.add(draft("Rome", "alice", "ruins")).await);

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            let id = c.id.clone();
            tokio::spawn(async move { app.comments.toggle_like(&id, &format!("user-{i}")).await })
        })
        .collect();
    for task in tasks {
        assert_ok!(task.await.unwrap());
    }

    let stored = app.comments.get(&c.id).await.unwrap().unwrap();
    assert_eq!(stored.likes_count, 32);
    assert_eq!(stored.liked_by_users.len(), 32);
}

#[tokio::test]
async fn city_listing_and_lifecycle() {
    let app = TestApp::new();
    let first = assert_ok!(app.comments.add(draft("Paris", "alice", "croissants")).await);
    assert_ok!(app.comments.add(draft("paris", "bob", "museums")).await);
    assert_ok!(app.comments.add(draft("Berlin", "carol", "techno")).await);

    let paris = assert_ok!(app.comments.list_by_city("PARIS").await);
    assert_eq!(paris.len(), 2);
    assert_eq!(paris[0].id, first.id);

    let err = assert_err!(app.comments.list_by_city("Madrid").await);
    assert!(matches!(err, DomainError::NotFound(_)));

    let edited = assert_ok!(
        app.comments
            .update(
                &first.id,
                CommentEdit {
                    comment: "pain au chocolat".into(),
                    image: None,
                },
            )
            .await
    );
    assert_eq!(edited.comment, "pain au chocolat");
    assert!(edited.updated_at.is_some());

    assert_ok!(app.comments.delete(&first.id).await);
    assert!(assert_ok!(app.comments.get(&first.id).await).is_none());
    assert_err!(app.comments.delete(&first.id).await);
}

#[tokio::test]
async fn uploaded_image_is_stored_as_url() {
    let app = TestApp::new();
    let mut new = draft("Vienna", "alice", "opera");
    new.image = Some(ImageSource::Upload(MediaUpload::new(
        vec![0x89, b'P', b'N', b'G'],
        mime::IMAGE_PNG,
    )));

    let c = assert_ok!(app.comments.add(new).await);
    assert_eq!(c.image_url.as_deref(), Some("/media/upload-1.png"));
    assert_eq!(app.upload_count(), 1);
}

#[tokio::test]
async fn reply_deletion_is_owner_only() {
    let app = TestApp::new();
    let c = assert_ok!(app.comments.add(draft("Prague", "alice", "bridges")).await);
    let c = assert_ok!(
        app.comments
            .add_reply(
                &c.id,
                NewReply {
                    username: "bob".into(),
                    text: "castle too".into(),
                },
            )
            .await
    );
    let reply_id = c.replies[0].id.clone();

    let err = assert_err!(app.comments.delete_reply(&c.id, &reply_id, "alice").await);
    assert!(matches!(err, DomainError::NotFound(_)));

    let c = assert_ok!(app.comments.delete_reply(&c.id, &reply_id, "bob").await);
    assert!(c.replies.is_empty());
}
