use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::api::error::ApiResult;
use crate::domain::{PageRequest, Paginated, ProductSummary, Shop};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::shop_service::{self, ShopInput};

pub async fn create_shop(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<ShopInput>,
) -> ApiResult<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let shop = shop_service::create_shop(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

pub async fn get_my_shop(State(state): State<AppState>, claims: Claims) -> ApiResult<Json<Shop>> {
    let user_id = claims.user_id()?;
    Ok(Json(shop_service::get_my_shop(&state, user_id).await?))
}

pub async fn get_shop(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Shop>> {
    Ok(Json(shop_service::get_shop_by_slug(&state, &slug).await?))
}

pub async fn list_shop_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<Paginated<ProductSummary>>> {
    let shop = shop_service::get_shop_by_slug(&state, &slug).await?;
    Ok(Json(
        shop_service::list_shop_products(&state, shop.id, page).await?,
    ))
}
