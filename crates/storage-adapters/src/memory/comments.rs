use async_trait::async_trait;
use domains::{Comment, CommentRepository};

use super::SequencedMap;

/// Comment store keyed by comment id; storage order is insertion order.
pub struct InMemoryCommentRepository {
    comments: SequencedMap<Comment>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            comments: SequencedMap::new(),
        }
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_city(&self, city_name: &str) -> anyhow::Result<Vec<Comment>> {
        let wanted = city_name.to_lowercase();
        Ok(self
            .comments
            .values_where(|c| c.city_name.to_lowercase() == wanted))
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Comment>> {
        Ok(self.comments.get(id))
    }

    async fn save(&self, comment: Comment) -> anyhow::Result<Comment> {
        self.comments.upsert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    async fn exists_by_id(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.comments.contains(id))
    }

    async fn delete_by_id(&self, id: &str) -> anyhow::Result<()> {
        self.comments.remove(id);
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Comment>> {
        Ok(self.comments.values_where(|_| true))
    }
}
