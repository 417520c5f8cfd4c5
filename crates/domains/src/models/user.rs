use serde::{Deserialize, Serialize};

use super::new_id;

/// How many searches a user's history keeps.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

/// A named list of cities. A city appears at most once per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteGroup {
    pub name: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

impl FavoriteGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cities: Vec::new(),
        }
    }

    /// Returns `false` if the city was already present.
    pub fn add_city(&mut self, city: &str) -> bool {
        if self.cities.iter().any(|c| c == city) {
            return false;
        }
        self.cities.push(city.to_owned());
        true
    }
}

/// The user aggregate as far as favorites and search history go.
///
/// Profile and login data live with the identity provider; this record only
/// carries what the favorites engine mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub favorite_cities: Vec<String>,
    #[serde(default)]
    pub favorite_groups: Vec<FavoriteGroup>,
    /// Most recent first, at most [`SEARCH_HISTORY_LIMIT`] entries.
    #[serde(default)]
    pub search_history: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            username: username.into(),
            favorite_cities: Vec::new(),
            favorite_groups: Vec::new(),
            search_history: Vec::new(),
        }
    }

    /// Returns `false` if the city was already a favorite.
    pub fn add_favorite(&mut self, city: &str) -> bool {
        if self.favorite_cities.iter().any(|c| c == city) {
            return false;
        }
        self.favorite_cities.push(city.to_owned());
        true
    }

    /// Returns `false` if the city was not a favorite.
    pub fn remove_favorite(&mut self, city: &str) -> bool {
        let before = self.favorite_cities.len();
        self.favorite_cities.retain(|c| c != city);
        self.favorite_cities.len() != before
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut FavoriteGroup> {
        self.favorite_groups.iter_mut().find(|g| g.name == name)
    }

    /// Removes the first group with this name.
    pub fn remove_group(&mut self, name: &str) -> bool {
        match self.favorite_groups.iter().position(|g| g.name == name) {
            Some(index) => {
                self.favorite_groups.remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves `city` to the front of the history, dropping the oldest entry
    /// past the limit.
    pub fn record_search(&mut self, city: &str) {
        self.search_history.retain(|c| c != city);
        self.search_history.insert(0, city.to_owned());
        self.search_history.truncate(SEARCH_HISTORY_LIMIT);
    }
}
