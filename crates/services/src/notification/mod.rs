//! Notification service: persists notifications and pushes them to live
//! channels on a best-effort basis.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    DomainError, DomainResult, Notification, NotificationEvent, NotificationPush,
    NotificationRepository,
};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    /// `None` when no real-time transport is configured.
    push: Option<Arc<dyn NotificationPush>>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        push: Option<Arc<dyn NotificationPush>>,
    ) -> Self {
        Self {
            notifications,
            push,
        }
    }

    /// Stores a notification for `event` and then tries to push it.
    ///
    /// The stored record is the source of truth; a failed or impossible push
    /// is logged and never reported to the caller.
    pub async fn create(&self, event: NotificationEvent) -> DomainResult<Notification> {
        let notification = Notification::from_event(event, Utc::now());
        let saved = self
            .notifications
            .save(notification)
            .await
            .map_err(DomainError::storage)?;

        info!(
            notification_id = %saved.id,
            recipient = %saved.username,
            kind = %saved.kind,
            "notification created"
        );

        self.push_best_effort(&saved).await;
        Ok(saved)
    }

    async fn push_best_effort(&self, notification: &Notification) {
        let Some(push) = &self.push else {
            debug!(notification_id = %notification.id, "no push channel configured");
            return;
        };
        if let Err(err) = push.deliver(&notification.username, notification).await {
            warn!(
                notification_id = %notification.id,
                recipient = %notification.username,
                error = %err,
                "notification push failed"
            );
        }
    }

    /// Newest first.
    pub async fn list(&self, username: &str) -> DomainResult<Vec<Notification>> {
        self.notifications
            .find_by_user_recent_first(username)
            .await
            .map_err(DomainError::storage)
    }

    pub async fn count_unread(&self, username: &str) -> DomainResult<usize> {
        self.notifications
            .count_unread_by_user(username)
            .await
            .map_err(DomainError::storage)
    }

    /// Unknown ids are ignored.
    pub async fn mark_read(&self, id: &str) -> DomainResult<()> {
        let Some(mut notification) = self
            .notifications
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)?
        else {
            debug!(notification_id = %id, "mark read on unknown notification");
            return Ok(());
        };

        notification.read = true;
        self.notifications
            .save(notification)
            .await
            .map_err(DomainError::storage)?;
        Ok(())
    }

    /// Marks every unread notification of `username` as read and returns how
    /// many were flipped.
    pub async fn mark_all_read(&self, username: &str) -> DomainResult<usize> {
        let mut unread = self
            .notifications
            .find_unread_by_user_recent_first(username)
            .await
            .map_err(DomainError::storage)?;
        if unread.is_empty() {
            return Ok(0);
        }

        for notification in &mut unread {
            notification.read = true;
        }
        let flipped = unread.len();
        self.notifications
            .save_all(unread)
            .await
            .map_err(DomainError::storage)?;

        debug!(%username, flipped, "marked notifications read");
        Ok(flipped)
    }
}
