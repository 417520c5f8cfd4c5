//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the services.
//! Adapters report failures as `anyhow::Error`; the services translate them
//! into [`crate::DomainError`].

use async_trait::async_trait;

use crate::models::{Comment, MediaUpload, Notification, User};

/// Persistence contract for comments, replies included.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Case-insensitive match on the city name, in storage order.
    async fn find_by_city(&self, city_name: &str) -> anyhow::Result<Vec<Comment>>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Comment>>;
    /// Inserts or replaces the whole record.
    async fn save(&self, comment: Comment) -> anyhow::Result<Comment>;
    async fn exists_by_id(&self, id: &str) -> anyhow::Result<bool>;
    async fn delete_by_id(&self, id: &str) -> anyhow::Result<()>;
    /// Every comment, in storage order.
    async fn find_all(&self) -> anyhow::Result<Vec<Comment>>;
}

/// Persistence contract for notifications.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: Notification) -> anyhow::Result<Notification>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Notification>>;
    /// Newest first.
    async fn find_by_user_recent_first(&self, username: &str) -> anyhow::Result<Vec<Notification>>;
    /// Unread only, newest first.
    async fn find_unread_by_user_recent_first(
        &self,
        username: &str,
    ) -> anyhow::Result<Vec<Notification>>;
    async fn count_unread_by_user(&self, username: &str) -> anyhow::Result<usize>;
    async fn save_all(&self, notifications: Vec<Notification>) -> anyhow::Result<()>;
}

/// The user aggregate is owned elsewhere; the core reads and writes it whole.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn save(&self, user: User) -> anyhow::Result<User>;
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
}

/// Asset upload contract for comment images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores the bytes and returns the public URL of the image.
    async fn upload(&self, upload: MediaUpload) -> anyhow::Result<String>;
}

/// Real-time delivery of a freshly stored notification.
///
/// Delivery is best-effort: callers log a failure and move on.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationPush: Send + Sync {
    async fn deliver(&self, recipient: &str, notification: &Notification) -> anyhow::Result<()>;
}
