//! Live notification channels.
//!
//! Keeps the open connections of each user and routes freshly stored
//! notifications to them. A user may hold several connections at once;
//! connections whose receiver is gone are pruned on the next send.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Notification, NotificationPush};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

/// Serialized notification JSON, ready to be written to a socket.
pub type PushPayload = String;

struct Subscriber {
    id: u64,
    tx: mpsc::Sender<PushPayload>,
}

pub struct PushHub {
    channels: DashMap<String, Vec<Subscriber>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl PushHub {
    /// `capacity` bounds the backlog of each connection; a slow reader
    /// misses pushes instead of stalling the sender.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            next_id: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Registers a new connection for `username`.
    ///
    /// Returns the connection id (for [`PushHub::unsubscribe`]) and the
    /// receiving end of its channel.
    pub fn subscribe(&self, username: &str) -> (u64, mpsc::Receiver<PushPayload>) {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.channels
            .entry(username.to_owned())
            .or_default()
            .push(Subscriber { id, tx });
        debug!(%username, connection = id, "push channel opened");
        (id, rx)
    }

    pub fn unsubscribe(&self, username: &str, connection: u64) {
        if let Some(mut subscribers) = self.channels.get_mut(username) {
            subscribers.retain(|s| s.id != connection);
        }
        self.channels.remove_if(username, |_, subs| subs.is_empty());
        debug!(%username, connection, "push channel closed");
    }

    pub fn connection_count(&self, username: &str) -> usize {
        self.channels.get(username).map_or(0, |subs| subs.len())
    }
}

#[async_trait]
impl NotificationPush for PushHub {
    /// A recipient without live connections is not an error. Failing every
    /// open connection is.
    async fn deliver(&self, recipient: &str, notification: &Notification) -> anyhow::Result<()> {
        let payload = serde_json::to_string(notification)?;

        let Some(mut subscribers) = self.channels.get_mut(recipient) else {
            debug!(%recipient, "no live channel, push skipped");
            return Ok(());
        };

        let open = subscribers.len();
        let mut delivered = 0;
        subscribers.retain(|s| match s.tx.try_send(payload.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Closed(_)) => false,
        });
        drop(subscribers);
        self.channels.remove_if(recipient, |_, subs| subs.is_empty());

        if open > 0 && delivered == 0 {
            bail!("none of {open} live channel(s) for {recipient} accepted the push");
        }
        debug!(%recipient, delivered, "notification pushed");
        Ok(())
    }
}
