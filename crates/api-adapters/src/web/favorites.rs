use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domains::{CityPopularity, FavoriteGroup, User};
use serde::Deserialize;

use super::{error::ApiResult, AppState, UserQuery};

#[derive(Debug, Deserialize)]
pub(crate) struct UsernameBody {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CityBody {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupQuery {
    pub username: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupCityQuery {
    pub username: String,
    pub group: String,
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LimitQuery {
    pub limit: Option<usize>,
}

pub(crate) async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<UsernameBody>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.favorites.ensure_user(&body.username).await?))
}

pub(crate) async fn list_favorites(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.favorites.favorites(&query.username).await?))
}

pub(crate) async fn add_favorite(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    Json(body): Json<CityBody>,
) -> ApiResult<Json<Vec<String>>> {
    let user = state
        .favorites
        .add_favorite(&query.username, &body.city)
        .await?;
    Ok(Json(user.favorite_cities))
}

pub(crate) async fn remove_favorite(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let user = state
        .favorites
        .remove_favorite(&query.username, &city)
        .await?;
    Ok(Json(user.favorite_cities))
}

pub(crate) async fn popular_cities(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<CityPopularity>>> {
    let limit = query.limit.unwrap_or(state.popular_limit);
    Ok(Json(state.favorites.most_popular_cities(limit).await?))
}

pub(crate) async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<FavoriteGroup>>> {
    Ok(Json(state.favorites.groups(&query.username).await?))
}

pub(crate) async fn add_group(
    State(state): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<(StatusCode, Json<FavoriteGroup>)> {
    let group = state
        .favorites
        .add_group(&query.username, &query.name)
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub(crate) async fn delete_group(
    State(state): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<StatusCode> {
    state
        .favorites
        .delete_group(&query.username, &query.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn add_city_to_group(
    State(state): State<AppState>,
    Query(query): Query<GroupCityQuery>,
) -> ApiResult<Json<FavoriteGroup>> {
    let group = state
        .favorites
        .add_city_to_group(&query.username, &query.group, &query.city)
        .await?;
    Ok(Json(group))
}

pub(crate) async fn search_history(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.favorites.search_history(&query.username).await?))
}

pub(crate) async fn record_search(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    Json(body): Json<CityBody>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(
        state
            .favorites
            .record_search(&query.username, &body.city)
            .await?,
    ))
}
