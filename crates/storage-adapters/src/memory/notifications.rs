use std::cmp::Reverse;

use async_trait::async_trait;
use domains::{Notification, NotificationRepository};

use super::SequencedMap;

/// Notification store keyed by notification id.
pub struct InMemoryNotificationRepository {
    notifications: SequencedMap<Notification>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self {
            notifications: SequencedMap::new(),
        }
    }

    /// Newest first; equal timestamps fall back to the later insert first.
    fn recent_first(&self, keep: impl FnMut(&Notification) -> bool) -> Vec<Notification> {
        let mut rows = self.notifications.collect_where(keep);
        rows.sort_by_key(|(seq, n)| Reverse((n.created_at, *seq)));
        rows.into_iter().map(|(_, n)| n).collect()
    }
}

impl Default for InMemoryNotificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, notification: Notification) -> anyhow::Result<Notification> {
        self.notifications
            .upsert(notification.id.clone(), notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Notification>> {
        Ok(self.notifications.get(id))
    }

    async fn find_by_user_recent_first(&self, username: &str) -> anyhow::Result<Vec<Notification>> {
        Ok(self.recent_first(|n| n.username == username))
    }

    async fn find_unread_by_user_recent_first(
        &self,
        username: &str,
    ) -> anyhow::Result<Vec<Notification>> {
        Ok(self.recent_first(|n| n.username == username && !n.read))
    }

    async fn count_unread_by_user(&self, username: &str) -> anyhow::Result<usize> {
        Ok(self
            .notifications
            .collect_where(|n| n.username == username && !n.read)
            .len())
    }

    async fn save_all(&self, notifications: Vec<Notification>) -> anyhow::Result<()> {
        for notification in notifications {
            self.notifications
                .upsert(notification.id.clone(), notification);
        }
        Ok(())
    }
}
