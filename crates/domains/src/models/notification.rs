use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// What triggered a notification.
///
/// Serialized as its upper-case tag (`"LIKE"`, `"REPLY"`); unknown tags are
/// preserved in `Other` so stored records from newer writers still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Like,
    Reply,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Like => "LIKE",
            Self::Reply => "REPLY",
            Self::Other(tag) => tag,
        }
    }

    /// Display text shown to the recipient.
    pub fn message_for(&self, actor: &str) -> String {
        match self {
            Self::Like => format!("{actor} reacted to your comment"),
            Self::Reply => format!("{actor} replied to your comment"),
            Self::Other(_) => format!("{actor} did something"),
        }
    }
}

impl From<String> for NotificationKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "LIKE" => Self::Like,
            "REPLY" => Self::Reply,
            _ => Self::Other(tag),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored notification. Only `read` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    /// Recipient
    pub username: String,
    pub actor: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub target_city: String,
    pub comment_id: String,
    #[serde(default)]
    pub reply_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// The qualifying event a notification is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub recipient: String,
    pub actor: String,
    pub kind: NotificationKind,
    pub target_city: String,
    pub comment_id: String,
    pub reply_id: Option<String>,
}

impl Notification {
    pub fn from_event(event: NotificationEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            message: event.kind.message_for(&event.actor),
            username: event.recipient,
            actor: event.actor,
            kind: event.kind,
            target_city: event.target_city,
            comment_id: event.comment_id,
            reply_id: event.reply_id,
            read: false,
            created_at,
        }
    }
}
