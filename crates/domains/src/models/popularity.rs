use serde::{Deserialize, Serialize};

/// One row of the most-popular-cities ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPopularity {
    pub city_name: String,
    pub favorites_count: usize,
    pub comments_count: usize,
    /// Image of the first stored comment for the city that has one.
    pub first_comment_photo: Option<String>,
}
