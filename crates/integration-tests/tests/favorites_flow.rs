use domains::{DomainError, NewComment};
use integration_tests::TestApp;
use tokio_test::{assert_err, assert_ok};

async fn comment(app: &TestApp, city: &str, user: &str, image: Option<&str>) {
    let draft = NewComment {
        city_name: city.into(),
        username: user.into(),
        comment: "seen it".into(),
        image: image.map(|url| domains::ImageSource::Url(url.into())),
    };
    assert_ok!(app.comments.add(draft).await);
}

#[tokio::test]
async fn popularity_joins_favorites_with_comments() {
    let app = TestApp::new();
    for user in ["u1", "u2", "u3"] {
        assert_ok!(app.favorites.ensure_user(user).await);
    }
    assert_ok!(app.favorites.add_favorite("u1", "Paris").await);
    assert_ok!(app.favorites.add_favorite("u1", "Berlin").await);
    assert_ok!(app.favorites.add_favorite("u2", "Berlin").await);

    comment(&app, "Berlin", "u3", Some("a.jpg")).await;
    comment(&app, "Berlin", "u1", None).await;
    comment(&app, "Paris", "u2", None).await;

    let ranked = assert_ok!(app.favorites.most_popular_cities(10).await);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].city_name, "Berlin");
    assert_eq!(ranked[0].favorites_count, 2);
    assert_eq!(ranked[0].comments_count, 2);
    assert_eq!(ranked[0].first_comment_photo.as_deref(), Some("a.jpg"));
    assert_eq!(ranked[1].city_name, "Paris");
    assert_eq!(ranked[1].comments_count, 1);
    assert_eq!(ranked[1].first_comment_photo, None);

    let top = assert_ok!(app.favorites.most_popular_cities(1).await);
    assert_eq!(top.len(), 1);
}

#[tokio::test]
async fn groups_and_history() {
    let app = TestApp::new();
    assert_ok!(app.favorites.ensure_user("ana").await);

    assert_ok!(app.favorites.add_group("ana", "Summer").await);
    let group = assert_ok!(app.favorites.add_city_to_group("ana", "Summer", "Nice").await);
    assert_eq!(group.cities, vec!["Nice".to_string()]);
    let again = assert_ok!(app.favorites.add_city_to_group("ana", "Summer", "Nice").await);
    assert_eq!(again.cities.len(), 1);

    let err = assert_err!(app.favorites.add_city_to_group("ana", "Winter", "Oslo").await);
    assert!(matches!(err, DomainError::NotFound(_)));

    assert_ok!(app.favorites.delete_group("ana", "Summer").await);
    assert!(assert_ok!(app.favorites.groups("ana").await).is_empty());

    for i in 0..12 {
        assert_ok!(app.favorites.record_search("ana", &format!("City{i}")).await);
    }
    let history = assert_ok!(app.favorites.record_search("ana", "City5").await);
    assert_eq!(history.len(), 10);
    assert_eq!(history[0], "City5");
    assert_eq!(history[1], "City11");
    assert_eq!(history.iter().filter(|c| *c == "City5").count(), 1);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::new();
    let err = assert_err!(app.favorites.favorites("ghost").await);
    assert!(matches!(err, DomainError::NotFound(_)));
}
