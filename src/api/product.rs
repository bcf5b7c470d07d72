use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::api::error::ApiResult;
use crate::domain::{Paginated, Product, ProductSummary, Sku};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::product_service::{
    self, ProductInput, ProductQuery, ProductUpdate, ProductView, SkuUpdate,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Paginated<ProductSummary>>> {
    Ok(Json(product_service::list_products(&state, query).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ProductView>> {
    Ok(Json(product_service::get_product(&state, id).await?))
}

pub async fn get_product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ProductView>> {
    Ok(Json(
        product_service::get_product_by_slug(&state, &slug).await?,
    ))
}

pub async fn create_product(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<ProductInput>,
) -> ApiResult<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let product = product_service::create_product(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    let user_id = claims.user_id()?;
    Ok(Json(
        product_service::update_product(&state, user_id, id, payload).await?,
    ))
}

pub async fn delete_product(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let user_id = claims.user_id()?;
    product_service::delete_product(&state, user_id, id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

pub async fn update_sku(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<SkuUpdate>,
) -> ApiResult<Json<Sku>> {
    let user_id = claims.user_id()?;
    Ok(Json(
        product_service::update_sku(&state, user_id, id, payload).await?,
    ))
}
