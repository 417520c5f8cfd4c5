use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domains::Notification;
use serde_json::{json, Value};

use super::{error::ApiResult, AppState, UserQuery};

/// Newest first.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.notifications.list(&query.username).await?))
}

pub(crate) async fn count_unread(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    let unread = state.notifications.count_unread(&query.username).await?;
    Ok(Json(json!({ "unread": unread })))
}

pub(crate) async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.notifications.mark_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn mark_all_read(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    let updated = state.notifications.mark_all_read(&query.username).await?;
    Ok(Json(json!({ "updated": updated })))
}
