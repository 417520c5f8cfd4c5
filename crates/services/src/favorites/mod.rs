//! Favorites & popularity engine.
//!
//! Per-user favorite cities (flat and grouped), the bounded search history,
//! and the on-demand most-popular-cities ranking across all users.

mod popularity;

use std::sync::Arc;

use domains::{
    require_non_blank, CityPopularity, CommentRepository, DomainError, DomainResult,
    FavoriteGroup, User, UserRepository,
};
use tracing::{debug, info};

use crate::locks::KeyedLocks;

pub use popularity::rank_cities;

pub struct FavoritesService {
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    locks: KeyedLocks,
}

impl FavoritesService {
    pub fn new(users: Arc<dyn UserRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self {
            users,
            comments,
            locks: KeyedLocks::default(),
        }
    }

    /// Returns the user, creating an empty record on first sight.
    pub async fn ensure_user(&self, username: &str) -> DomainResult<User> {
        require_non_blank("username", username)?;

        let _guard = self.locks.acquire(username).await;
        if let Some(user) = self.find(username).await? {
            return Ok(user);
        }
        let user = self.save(User::new(username)).await?;
        info!(%username, "user provisioned");
        Ok(user)
    }

    pub async fn favorites(&self, username: &str) -> DomainResult<Vec<String>> {
        Ok(self.load(username).await?.favorite_cities)
    }

    /// Idempotent.
    pub async fn add_favorite(&self, username: &str, city: &str) -> DomainResult<User> {
        require_non_blank("cityName", city)?;

        let _guard = self.locks.acquire(username).await;
        let mut user = self.load(username).await?;
        if !user.add_favorite(city) {
            return Ok(user);
        }
        debug!(%username, %city, "favorite added");
        self.save(user).await
    }

    /// Removing a city that is not a favorite is a no-op.
    pub async fn remove_favorite(&self, username: &str, city: &str) -> DomainResult<User> {
        let _guard = self.locks.acquire(username).await;
        let mut user = self.load(username).await?;
        if !user.remove_favorite(city) {
            return Ok(user);
        }
        debug!(%username, %city, "favorite removed");
        self.save(user).await
    }

    pub async fn groups(&self, username: &str) -> DomainResult<Vec<FavoriteGroup>> {
        Ok(self.load(username).await?.favorite_groups)
    }

    /// Appends an empty group. Duplicate names are left to the caller.
    pub async fn add_group(&self, username: &str, name: &str) -> DomainResult<FavoriteGroup> {
        require_non_blank("groupName", name)?;

        let _guard = self.locks.acquire(username).await;
        let mut user = self.load(username).await?;
        let group = FavoriteGroup::new(name);
        user.favorite_groups.push(group.clone());
        self.save(user).await?;
        Ok(group)
    }

    /// Removes the first group with this name; unknown names are a no-op.
    pub async fn delete_group(&self, username: &str, name: &str) -> DomainResult<()> {
        let _guard = self.locks.acquire(username).await;
        let mut user = self.load(username).await?;
        if user.remove_group(name) {
            self.save(user).await?;
        }
        Ok(())
    }

    /// Idempotent per city.
    pub async fn add_city_to_group(
        &self,
        username: &str,
        group_name: &str,
        city: &str,
    ) -> DomainResult<FavoriteGroup> {
        require_non_blank("city", city)?;

        let _guard = self.locks.acquire(username).await;
        let mut user = self.load(username).await?;
        let group = user
            .group_mut(group_name)
            .ok_or_else(|| DomainError::not_found("group", group_name))?;
        if !group.add_city(city) {
            return Ok(group.clone());
        }
        let group = group.clone();
        self.save(user).await?;
        Ok(group)
    }

    pub async fn search_history(&self, username: &str) -> DomainResult<Vec<String>> {
        Ok(self.load(username).await?.search_history)
    }

    /// Moves `city` to the front of the history and returns the new history.
    pub async fn record_search(&self, username: &str, city: &str) -> DomainResult<Vec<String>> {
        require_non_blank("city", city)?;

        let _guard = self.locks.acquire(username).await;
        let mut user = self.load(username).await?;
        user.record_search(city);
        Ok(self.save(user).await?.search_history)
    }

    /// Joins every user's favorites with the current comments. Nothing is
    /// cached; each call reads a fresh snapshot.
    pub async fn most_popular_cities(&self, limit: usize) -> DomainResult<Vec<CityPopularity>> {
        let users = self.users.find_all().await.map_err(DomainError::storage)?;
        let comments = self
            .comments
            .find_all()
            .await
            .map_err(DomainError::storage)?;
        Ok(rank_cities(&users, &comments, limit))
    }

    async fn find(&self, username: &str) -> DomainResult<Option<User>> {
        self.users
            .find_by_username(username)
            .await
            .map_err(DomainError::storage)
    }

    async fn load(&self, username: &str) -> DomainResult<User> {
        self.find(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        self.users.save(user).await.map_err(DomainError::storage)
    }
}
