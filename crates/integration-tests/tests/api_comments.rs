use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use integration_tests::{
    http::{send, send_request},
    TestApp,
};
use serde_json::json;

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new().router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn comment_lifecycle_over_http() {
    let app = TestApp::new().router();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({ "cityName": "Kyoto", "username": "alice", "comment": "temples" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["likesCount"], 0);
    assert_eq!(created["cityName"], "Kyoto");

    let (status, listed) = send(&app, Method::GET, "/api/comments/city/kyoto", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, liked) = send(
        &app,
        Method::POST,
        &format!("/api/comments/{id}/like?username=bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likesCount"], 1);
    assert_eq!(liked["likedByUsers"], json!(["bob"]));

    let (status, replied) = send(
        &app,
        Method::POST,
        &format!("/api/comments/{id}/replies"),
        Some(json!({ "username": "bob", "reply": "gardens too" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(replied["replies"][0]["text"], "gardens too");

    let (_, count) = send(&app, Method::GET, "/api/notifications/count?username=alice", None).await;
    assert_eq!(count["unread"], 2);

    let (_, inbox) = send(&app, Method::GET, "/api/notifications?username=alice", None).await;
    assert_eq!(inbox[0]["type"], "REPLY");
    assert_eq!(inbox[1]["type"], "LIKE");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/comments/{id}"),
        Some(json!({ "comment": "temples and shrines" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["comment"], "temples and shrines");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/comments/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, err) = send(&app, Method::GET, &format!("/api/comments/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_comment_is_rejected() {
    let app = TestApp::new().router();
    let (status, err) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({ "cityName": "Kyoto", "username": "alice", "comment": "x".repeat(501) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_city_is_not_found() {
    let app = TestApp::new().router();
    let (status, _) = send(&app, Method::GET, "/api/comments/city/Atlantis", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn multipart_upload_creates_comment_with_image() {
    let fixture = TestApp::new();
    let app = fixture.router();

    let boundary = "cityboard-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"data\"\r\n\
         Content-Type: application/json\r\n\r\n\
         {{\"cityName\":\"Porto\",\"username\":\"alice\",\"comment\":\"tiles\"}}\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"tile.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         PNGDATA\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/comments")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, created) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["imageUrl"], "/media/upload-1.png");
    assert_eq!(fixture.upload_count(), 1);
}

#[tokio::test]
async fn reply_owned_by_someone_else_cannot_be_deleted() {
    let app = TestApp::new().router();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/comments",
        Some(json!({ "cityName": "Seoul", "username": "alice", "comment": "food" })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    let (_, replied) = send(
        &app,
        Method::POST,
        &format!("/api/comments/{id}/replies"),
        Some(json!({ "username": "bob", "text": "markets" })),
    )
    .await;
    let reply_id = replied["replies"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/comments/{id}/replies/{reply_id}");
    let (status, _) = send(&app, Method::DELETE, &format!("{uri}?username=alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, after) = send(&app, Method::DELETE, &format!("{uri}?username=bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["replies"], json!([]));
}
