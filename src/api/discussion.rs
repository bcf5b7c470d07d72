use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::api::error::ApiResult;
use crate::domain::{Discussion, PageRequest, Paginated};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::discussion_service::{self, DiscussionInput};

pub async fn list_discussions(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<Paginated<Discussion>>> {
    Ok(Json(
        discussion_service::list_discussions(&state, product_id, page).await?,
    ))
}

pub async fn create_discussion(
    State(state): State<AppState>,
    claims: Claims,
    Path(product_id): Path<i32>,
    Json(payload): Json<DiscussionInput>,
) -> ApiResult<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let discussion =
        discussion_service::create_discussion(&state, user_id, product_id, payload).await?;
    Ok((StatusCode::CREATED, Json(discussion)))
}

pub async fn delete_discussion(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let user_id = claims.user_id()?;
    discussion_service::delete_discussion(&state, user_id, id).await?;
    Ok(Json(json!({ "message": "Discussion deleted" })))
}

pub async fn create_reply(
    State(state): State<AppState>,
    claims: Claims,
    Path(discussion_id): Path<i32>,
    Json(payload): Json<DiscussionInput>,
) -> ApiResult<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let reply = discussion_service::reply(&state, user_id, discussion_id, payload).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn delete_reply(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let user_id = claims.user_id()?;
    discussion_service::delete_reply(&state, user_id, id).await?;
    Ok(Json(json!({ "message": "Reply deleted" })))
}
