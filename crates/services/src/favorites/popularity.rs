use std::collections::HashMap;

use domains::{CityPopularity, Comment, User};

/// Ranks cities by how many users list them as a favorite.
///
/// Equal counts are ordered by city name so repeated calls over the same
/// snapshot agree. Comments are matched to a city by exact name and scanned
/// in the order given; the first one with an image supplies the photo.
pub fn rank_cities(users: &[User], comments: &[Comment], limit: usize) -> Vec<CityPopularity> {
    let mut favorites: HashMap<&str, usize> = HashMap::new();
    for city in users.iter().flat_map(|u| &u.favorite_cities) {
        *favorites.entry(city.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = favorites.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    let mut by_city: HashMap<&str, Vec<&Comment>> = HashMap::new();
    for comment in comments {
        by_city
            .entry(comment.city_name.as_str())
            .or_default()
            .push(comment);
    }

    ranked
        .into_iter()
        .map(|(city, favorites_count)| {
            let city_comments = by_city.get(city).map(Vec::as_slice).unwrap_or_default();
            CityPopularity {
                city_name: city.to_owned(),
                favorites_count,
                comments_count: city_comments.len(),
                first_comment_photo: city_comments
                    .iter()
                    .find_map(|c| c.photo())
                    .map(str::to_owned),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(name: &str, favorites: &[&str]) -> User {
        let mut user = User::new(name);
        for city in favorites {
            user.add_favorite(city);
        }
        user
    }

    fn comment(city: &str, image: Option<&str>) -> Comment {
        Comment::new(
            city.into(),
            "someone".into(),
            "text".into(),
            image.map(str::to_owned),
            Utc::now(),
        )
    }

    #[test]
    fn ranks_by_favorites_and_attaches_comment_stats() {
        let users = vec![user("a", &["Berlin", "Paris"]), user("b", &["Berlin"])];
        let comments = vec![
            comment("Berlin", None),
            comment("Paris", None),
            comment("Berlin", Some("a.jpg")),
        ];

        let ranked = rank_cities(&users, &comments, 10);
        assert_eq!(
            ranked,
            vec![
                CityPopularity {
                    city_name: "Berlin".into(),
                    favorites_count: 2,
                    comments_count: 2,
                    first_comment_photo: Some("a.jpg".into()),
                },
                CityPopularity {
                    city_name: "Paris".into(),
                    favorites_count: 1,
                    comments_count: 1,
                    first_comment_photo: None,
                },
            ]
        );
    }

    #[test]
    fn ties_are_ordered_by_name_and_limit_applies() {
        let users = vec![
            user("a", &["Vienna", "Oslo", "Rome"]),
            user("b", &["Rome"]),
        ];

        let ranked = rank_cities(&users, &[], 2);
        let names: Vec<_> = ranked.iter().map(|c| c.city_name.as_str()).collect();
        assert_eq!(names, vec!["Rome", "Oslo"]);
        assert!(ranked.iter().all(|c| c.comments_count == 0));
    }

    #[test]
    fn empty_image_urls_are_skipped() {
        let users = vec![user("a", &["Lima"])];
        let comments = vec![comment("Lima", Some("")), comment("Lima", Some("b.png"))];

        let ranked = rank_cities(&users, &comments, 10);
        assert_eq!(ranked[0].first_comment_photo.as_deref(), Some("b.png"));
    }
}
