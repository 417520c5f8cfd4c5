use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::ImageSource;
use super::{new_id, require_non_blank};
use crate::errors::{DomainError, DomainResult};

/// Upper bound on comment text, counted in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// A comment left on a city.
///
/// `likes_count` always equals `liked_by_users.len()` after a mutation made
/// through [`Comment::toggle_like`]. Collections default to empty when a
/// stored record omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub city_name: String,
    /// Author
    pub username: String,
    pub comment: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes_count: usize,
    #[serde(default)]
    pub liked_by_users: BTreeSet<String>,
    /// Insertion order is display order.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(
        city_name: String,
        username: String,
        comment: String,
        image_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            city_name,
            username,
            comment,
            image_url,
            created_at,
            updated_at: None,
            likes_count: 0,
            liked_by_users: BTreeSet::new(),
            replies: Vec::new(),
        }
    }

    pub fn is_authored_by(&self, username: &str) -> bool {
        self.username == username
    }

    pub fn is_liked_by(&self, username: &str) -> bool {
        self.liked_by_users.contains(username)
    }

    /// Flips `username`'s like. Returns `true` when the like was added.
    ///
    /// The count is recomputed from the set, which also repairs a stored
    /// record whose count had drifted.
    pub fn toggle_like(&mut self, username: &str) -> bool {
        let added = if self.liked_by_users.remove(username) {
            false
        } else {
            self.liked_by_users.insert(username.to_owned());
            true
        };
        self.likes_count = self.liked_by_users.len();
        added
    }

    /// Replaces the text and stamps `updated_at`. The image is only replaced
    /// when a new one is supplied.
    pub fn apply_edit(&mut self, text: String, image_url: Option<String>, at: DateTime<Utc>) {
        self.comment = text;
        self.updated_at = Some(at);
        if image_url.is_some() {
            self.image_url = image_url;
        }
    }

    /// Removes the reply only when both the id and the author match.
    pub fn remove_reply(&mut self, reply_id: &str, username: &str) -> Option<Reply> {
        let index = self
            .replies
            .iter()
            .position(|r| r.id == reply_id && r.username == username)?;
        Some(self.replies.remove(index))
    }

    /// The image URL if one is set and non-empty.
    pub fn photo(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// A reply to a comment. Owned by its parent and never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(username: String, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            username,
            text,
            created_at,
        }
    }
}

/// Input for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub city_name: String,
    pub username: String,
    pub comment: String,
    pub image: Option<ImageSource>,
}

impl NewComment {
    pub fn validate(&self) -> DomainResult<()> {
        require_non_blank("cityName", &self.city_name)?;
        require_non_blank("username", &self.username)?;
        validate_comment_text(&self.comment)
    }
}

/// Partial update of a comment. `image: None` keeps the current image.
#[derive(Debug, Clone)]
pub struct CommentEdit {
    pub comment: String,
    pub image: Option<ImageSource>,
}

/// Input for replying to a comment.
#[derive(Debug, Clone)]
pub struct NewReply {
    pub username: String,
    pub text: String,
}

impl NewReply {
    pub fn validate(&self) -> DomainResult<()> {
        require_non_blank("username", &self.username)?;
        require_non_blank("reply", &self.text)
    }
}

pub fn validate_comment_text(text: &str) -> DomainResult<()> {
    require_non_blank("comment", text)?;
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(DomainError::validation(format!(
            "comment must be at most {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment_by(author: &str) -> Comment {
        Comment::new(
            "Berlin".into(),
            author.into(),
            "Great city".into(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn toggle_like_adds_then_removes() {
        let mut comment = comment_by("alice");

        assert!(comment.toggle_like("bob"));
        assert!(comment.is_liked_by("bob"));
        assert_eq!(comment.likes_count, 1);

        assert!(!comment.toggle_like("bob"));
        assert!(!comment.is_liked_by("bob"));
        assert_eq!(comment.likes_count, 0);
    }

    #[test]
    fn toggle_like_repairs_drifted_count() {
        let mut comment = comment_by("alice");
        comment.likes_count = 7;
        comment.liked_by_users.insert("carol".into());

        comment.toggle_like("bob");
        assert_eq!(comment.likes_count, 2);
    }

    #[test]
    fn remove_reply_requires_matching_author() {
        let mut comment = comment_by("alice");
        let reply = Reply::new("alice".into(), "thanks".into(), Utc::now());
        let id = reply.id.clone();
        comment.replies.push(reply);

        assert!(comment.remove_reply(&id, "bob").is_none());
        assert_eq!(comment.replies.len(), 1);

        assert!(comment.remove_reply(&id, "alice").is_some());
        assert!(comment.replies.is_empty());
    }

    #[test]
    fn apply_edit_without_image_keeps_old_one() {
        let mut comment = comment_by("alice");
        comment.image_url = Some("old.jpg".into());

        comment.apply_edit("edited".into(), None, Utc::now());
        assert_eq!(comment.comment, "edited");
        assert_eq!(comment.image_url.as_deref(), Some("old.jpg"));
        assert!(comment.updated_at.is_some());

        comment.apply_edit("again".into(), Some("new.jpg".into()), Utc::now());
        assert_eq!(comment.image_url.as_deref(), Some("new.jpg"));
    }

    #[test]
    fn comment_text_limits() {
        assert!(validate_comment_text("   ").is_err());
        assert!(validate_comment_text(&"x".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(validate_comment_text(&"x".repeat(MAX_COMMENT_CHARS + 1)).is_err());
        // characters, not bytes
        assert!(validate_comment_text(&"ü".repeat(MAX_COMMENT_CHARS)).is_ok());
    }

    #[test]
    fn missing_collections_deserialize_as_empty() {
        let json = r#"{
            "id": "c1",
            "cityName": "Paris",
            "username": "alice",
            "comment": "hi",
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.likes_count, 0);
        assert!(comment.liked_by_users.is_empty());
        assert!(comment.replies.is_empty());
        assert!(comment.image_url.is_none());
    }
}
