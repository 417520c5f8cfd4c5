//! Shared fixtures: the real services over the in-memory stores, with
//! mocked media storage that counts what it was handed.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use api_adapters::PushHub;
use async_trait::async_trait;
use domains::{Comment, CommentRepository, MockMediaStorage, NotificationPush};
use services::{CommentService, FavoritesService, NotificationService};
use storage_adapters::{
    InMemoryCommentRepository, InMemoryNotificationRepository, InMemoryUserRepository,
};

/// Comment store that yields to the scheduler between reading a record and
/// the caller writing it back, so concurrent mutations really interleave.
pub struct YieldingComments<R> {
    inner: R,
}

impl<R> YieldingComments<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: CommentRepository> CommentRepository for YieldingComments<R> {
    async fn find_by_city(&self, city_name: &str) -> anyhow::Result<Vec<Comment>> {
        self.inner.find_by_city(city_name).await
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Comment>> {
        let found = self.inner.find_by_id(id).await;
        tokio::task::yield_now().await;
        found
    }

    async fn save(&self, comment: Comment) -> anyhow::Result<Comment> {
        tokio::task::yield_now().await;
        self.inner.save(comment).await
    }

    async fn exists_by_id(&self, id: &str) -> anyhow::Result<bool> {
        self.inner.exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: &str) -> anyhow::Result<()> {
        self.inner.delete_by_id(id).await
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Comment>> {
        self.inner.find_all().await
    }
}

/// Media mock handing out `/media/upload-<n>.<subtype>`.
fn counting_media(uploads: Arc<AtomicUsize>) -> MockMediaStorage {
    let mut media = MockMediaStorage::new();
    media.expect_upload().returning(move |upload| {
        let n = uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!(
            "/media/upload-{n}.{}",
            upload.content_type.subtype()
        ))
    });
    media
}

pub struct TestApp {
    pub comments: Arc<CommentService>,
    pub notifications: Arc<NotificationService>,
    pub favorites: Arc<FavoritesService>,
    pub push: Arc<PushHub>,
    uploads: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_comment_store(Arc::new(InMemoryCommentRepository::new()))
    }

    pub fn with_comment_store(comment_repo: Arc<dyn CommentRepository>) -> Self {
        let uploads = Arc::new(AtomicUsize::new(0));
        let push = Arc::new(PushHub::new(16));
        let push_port: Arc<dyn NotificationPush> = push.clone();

        let notifications = Arc::new(NotificationService::new(
            Arc::new(InMemoryNotificationRepository::new()),
            Some(push_port),
        ));
        let comments = Arc::new(CommentService::new(
            comment_repo.clone(),
            Arc::new(counting_media(uploads.clone())),
            notifications.clone(),
        ));
        let favorites = Arc::new(FavoritesService::new(
            Arc::new(InMemoryUserRepository::new()),
            comment_repo,
        ));

        Self {
            comments,
            notifications,
            favorites,
            push,
            uploads,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    #[cfg(feature = "web-axum")]
    pub fn router(&self) -> axum::Router {
        api_adapters::web::router(api_adapters::web::AppState {
            comments: self.comments.clone(),
            notifications: self.notifications.clone(),
            favorites: self.favorites.clone(),
            push: self.push.clone(),
            popular_limit: 10,
        })
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "web-axum")]
pub mod http {
    //! Request helpers for driving the router in-process.

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");
        send_request(app, request).await
    }

    pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is json")
        };
        (status, json)
    }
}
