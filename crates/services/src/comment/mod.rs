//! Comment interaction engine.
//!
//! Owns the comment lifecycle, like toggling and replies, and raises
//! notifications for likes and replies by someone other than the author.
//! Mutations are load → mutate → save of the whole record, serialized per
//! comment id; notifications are only raised after the save succeeded and
//! their failure never undoes it.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Comment, CommentEdit, CommentRepository, DomainError, DomainResult, ImageSource,
    MediaStorage, NewComment, NewReply, NotificationEvent, NotificationKind, Reply,
};
use tracing::{debug, info, warn};

use crate::locks::KeyedLocks;
use crate::notification::NotificationService;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStorage>,
    notifications: Arc<NotificationService>,
    locks: KeyedLocks,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStorage>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            comments,
            media,
            notifications,
            locks: KeyedLocks::default(),
        }
    }

    /// All comments for a city, matched case-insensitively.
    ///
    /// A city without comments is reported as `NotFound`, not as an empty list.
    pub async fn list_by_city(&self, city_name: &str) -> DomainResult<Vec<Comment>> {
        let comments = self
            .comments
            .find_by_city(city_name)
            .await
            .map_err(DomainError::storage)?;
        if comments.is_empty() {
            return Err(DomainError::NotFound(format!(
                "no comments found for city: {city_name}"
            )));
        }
        Ok(comments)
    }

    /// Absence is a normal result here.
    pub async fn get(&self, id: &str) -> DomainResult<Option<Comment>> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)
    }

    /// Validates, uploads the image if one was supplied, then persists.
    /// A failed upload fails the whole call before anything is stored.
    pub async fn add(&self, draft: NewComment) -> DomainResult<Comment> {
        draft.validate()?;
        let image_url = self.resolve_image(draft.image).await?;

        let comment = Comment::new(
            draft.city_name,
            draft.username,
            draft.comment,
            image_url,
            Utc::now(),
        );
        let saved = self
            .comments
            .save(comment)
            .await
            .map_err(DomainError::storage)?;

        info!(
            comment_id = %saved.id,
            city = %saved.city_name,
            username = %saved.username,
            with_image = saved.image_url.is_some(),
            "comment added"
        );
        Ok(saved)
    }

    /// Replaces the text; the image only changes when a new one is supplied.
    pub async fn update(&self, id: &str, edit: CommentEdit) -> DomainResult<Comment> {
        domains::validate_comment_text(&edit.comment)?;

        let _guard = self.locks.acquire(id).await;
        let mut comment = self.load(id).await?;
        let image_url = self.resolve_image(edit.image).await?;

        comment.apply_edit(edit.comment, image_url, Utc::now());
        let saved = self
            .comments
            .save(comment)
            .await
            .map_err(DomainError::storage)?;

        debug!(comment_id = %id, "comment updated");
        Ok(saved)
    }

    /// No ownership check: authorization belongs to the caller.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let _guard = self.locks.acquire(id).await;
        let exists = self
            .comments
            .exists_by_id(id)
            .await
            .map_err(DomainError::storage)?;
        if !exists {
            return Err(DomainError::not_found("comment", id));
        }

        self.comments
            .delete_by_id(id)
            .await
            .map_err(DomainError::storage)?;

        info!(comment_id = %id, "comment deleted");
        Ok(())
    }

    /// Likes the comment for `username`, or unlikes it if they already did.
    ///
    /// Only a new like by someone other than the author notifies the author.
    pub async fn toggle_like(&self, comment_id: &str, username: &str) -> DomainResult<Comment> {
        domains::require_non_blank("username", username)?;

        let guard = self.locks.acquire(comment_id).await;
        let mut comment = self.load(comment_id).await?;
        let added = comment.toggle_like(username);
        let saved = self
            .comments
            .save(comment)
            .await
            .map_err(DomainError::storage)?;
        drop(guard);

        debug!(
            comment_id = %saved.id,
            %username,
            liked = added,
            likes = saved.likes_count,
            "like toggled"
        );

        if added && !saved.is_authored_by(username) {
            self.notify(&saved, username, NotificationKind::Like, None)
                .await;
        }
        Ok(saved)
    }

    /// Appends a reply; replies by someone other than the author notify the
    /// author with the new reply's id.
    pub async fn add_reply(&self, comment_id: &str, reply: NewReply) -> DomainResult<Comment> {
        reply.validate()?;

        let guard = self.locks.acquire(comment_id).await;
        let mut comment = self.load(comment_id).await?;
        let reply = Reply::new(reply.username, reply.text, Utc::now());
        let reply_id = reply.id.clone();
        let author = reply.username.clone();
        comment.replies.push(reply);
        let saved = self
            .comments
            .save(comment)
            .await
            .map_err(DomainError::storage)?;
        drop(guard);

        debug!(comment_id = %saved.id, %reply_id, username = %author, "reply added");

        if !saved.is_authored_by(&author) {
            self.notify(&saved, &author, NotificationKind::Reply, Some(reply_id))
                .await;
        }
        Ok(saved)
    }

    /// Removes a reply written by `requesting_username`.
    ///
    /// A reply owned by someone else is reported exactly like a missing one.
    pub async fn delete_reply(
        &self,
        comment_id: &str,
        reply_id: &str,
        requesting_username: &str,
    ) -> DomainResult<Comment> {
        let _guard = self.locks.acquire(comment_id).await;
        let mut comment = self.load(comment_id).await?;

        if comment
            .remove_reply(reply_id, requesting_username)
            .is_none()
        {
            return Err(DomainError::NotFound(format!(
                "reply not found or not deletable by you: {reply_id}"
            )));
        }

        let saved = self
            .comments
            .save(comment)
            .await
            .map_err(DomainError::storage)?;
        debug!(%comment_id, %reply_id, "reply deleted");
        Ok(saved)
    }

    async fn load(&self, id: &str) -> DomainResult<Comment> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::not_found("comment", id))
    }

    async fn resolve_image(&self, image: Option<ImageSource>) -> DomainResult<Option<String>> {
        match image {
            None => Ok(None),
            Some(ImageSource::Url(url)) => Ok(Some(url).filter(|u| !u.trim().is_empty())),
            Some(ImageSource::Upload(upload)) => self
                .media
                .upload(upload)
                .await
                .map(Some)
                .map_err(DomainError::upstream),
        }
    }

    async fn notify(
        &self,
        comment: &Comment,
        actor: &str,
        kind: NotificationKind,
        reply_id: Option<String>,
    ) {
        let event = NotificationEvent {
            recipient: comment.username.clone(),
            actor: actor.to_owned(),
            kind,
            target_city: comment.city_name.clone(),
            comment_id: comment.id.clone(),
            reply_id,
        };
        if let Err(err) = self.notifications.create(event).await {
            warn!(comment_id = %comment.id, error = %err, "notification not created");
        }
    }
}
