use async_trait::async_trait;
use domains::{User, UserRepository};

use super::SequencedMap;

/// User store keyed by username.
pub struct InMemoryUserRepository {
    users: SequencedMap<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: SequencedMap::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(username))
    }

    async fn save(&self, user: User) -> anyhow::Result<User> {
        self.users.upsert(user.username.clone(), user.clone());
        Ok(user)
    }

    /// In registration order.
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.values_where(|_| true))
    }
}
