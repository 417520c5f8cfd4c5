//! HTTP and websocket surface over the cityboard services.

mod comments;
pub mod error;
mod favorites;
pub mod form;
mod notifications;
mod ws;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use services::{CommentService, FavoritesService, NotificationService};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::push::PushHub;

pub use error::{ApiError, ApiResult};

/// Everything the handlers reach for.
#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentService>,
    pub notifications: Arc<NotificationService>,
    pub favorites: Arc<FavoritesService>,
    pub push: Arc<PushHub>,
    /// Used by `/api/popular-cities` when no `limit` is given.
    pub popular_limit: usize,
}

/// `?username=` shared by most user-scoped routes.
#[derive(Debug, Deserialize)]
pub(crate) struct UserQuery {
    pub username: String,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/users", post(favorites::register_user))
        .route("/comments", post(comments::create))
        .route("/comments/city/{city}", get(comments::list_by_city))
        .route(
            "/comments/{id}",
            get(comments::get_one)
                .put(comments::update)
                .delete(comments::remove),
        )
        .route("/comments/{id}/like", post(comments::toggle_like))
        .route("/comments/{id}/replies", post(comments::add_reply))
        .route(
            "/comments/{id}/replies/{reply_id}",
            delete(comments::delete_reply),
        )
        .route("/notifications", get(notifications::list))
        .route("/notifications/count", get(notifications::count_unread))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/{city}", delete(favorites::remove_favorite))
        .route("/popular-cities", get(favorites::popular_cities))
        .route(
            "/groups",
            get(favorites::list_groups)
                .post(favorites::add_group)
                .delete(favorites::delete_group),
        )
        .route("/groups/cities", post(favorites::add_city_to_group))
        .route(
            "/search-history",
            get(favorites::search_history).post(favorites::record_search),
        );

    Router::new()
        .route("/health", get(health))
        .route("/ws/notifications", get(ws::notifications_socket))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
