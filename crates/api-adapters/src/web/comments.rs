use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domains::{Comment, CommentEdit, ImageSource, NewComment, NewReply};
use serde::Deserialize;

use super::{error::ApiResult, form::CommentForm, ApiError, AppState, UserQuery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCommentBody {
    pub city_name: String,
    pub username: String,
    pub comment: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateCommentBody {
    pub comment: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyBody {
    pub username: String,
    #[serde(alias = "reply")]
    pub text: String,
}

/// An uploaded file wins over a URL sent alongside it.
fn image_source(file: Option<domains::MediaUpload>, url: Option<String>) -> Option<ImageSource> {
    match (file, url) {
        (Some(upload), _) => Some(ImageSource::Upload(upload)),
        (None, Some(url)) => Some(ImageSource::Url(url)),
        (None, None) => None,
    }
}

pub(crate) async fn list_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.comments.list_by_city(&city).await?))
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Comment>> {
    state
        .comments
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("comment not found: {id}")))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    form: CommentForm<CreateCommentBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let CommentForm { data, file } = form;
    let draft = NewComment {
        city_name: data.city_name,
        username: data.username,
        comment: data.comment,
        image: image_source(file, data.image_url),
    };
    let comment = state.comments.add(draft).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: CommentForm<UpdateCommentBody>,
) -> ApiResult<Json<Comment>> {
    let CommentForm { data, file } = form;
    let edit = CommentEdit {
        comment: data.comment,
        image: image_source(file, data.image_url),
    };
    Ok(Json(state.comments.update(&id, edit).await?))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.comments.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(state.comments.toggle_like(&id, &query.username).await?))
}

pub(crate) async fn add_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReplyBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let reply = NewReply {
        username: body.username,
        text: body.text,
    };
    let comment = state.comments.add_reply(&id, reply).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn delete_reply(
    State(state): State<AppState>,
    Path((id, reply_id)): Path<(String, String)>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(
        state
            .comments
            .delete_reply(&id, &reply_id, &query.username)
            .await?,
    ))
}
