use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::api::error::ApiResult;
use crate::domain::{Category, CategoryNode};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::category_service::{self, CategoryInput, CategoryUpdate};

pub async fn list_tree(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryNode>>> {
    Ok(Json(category_service::list_tree(&state).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CategoryNode>> {
    Ok(Json(category_service::get_category(&state, id).await?))
}

pub async fn get_lineage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(category_service::get_lineage(&state, id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CategoryInput>,
) -> ApiResult<impl IntoResponse> {
    claims.require_admin()?;
    let category = category_service::create_category(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    claims.require_admin()?;
    Ok(Json(
        category_service::update_category(&state, id, payload).await?,
    ))
}

pub async fn delete_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    claims.require_admin()?;
    category_service::delete_category(&state, id).await?;
    Ok(Json(json!({ "message": "Category deleted" })))
}
