use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::api::error::ApiResult;
use crate::domain::Address;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::address_service::{self, AddressInput, AddressUpdate};

pub async fn list_addresses(
    State(state): State<AppState>,
    claims: Claims,
) -> ApiResult<Json<Vec<Address>>> {
    let user_id = claims.user_id()?;
    Ok(Json(address_service::list_addresses(&state, user_id).await?))
}

pub async fn create_address(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<AddressInput>,
) -> ApiResult<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let address = address_service::create_address(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn get_address(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Address>> {
    let user_id = claims.user_id()?;
    Ok(Json(address_service::get_address(&state, user_id, id).await?))
}

pub async fn update_address(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<AddressUpdate>,
) -> ApiResult<Json<Address>> {
    let user_id = claims.user_id()?;
    Ok(Json(
        address_service::update_address(&state, user_id, id, payload).await?,
    ))
}

pub async fn set_default(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Address>> {
    let user_id = claims.user_id()?;
    Ok(Json(
        address_service::set_default_address(&state, user_id, id).await?,
    ))
}

pub async fn set_pickup(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Address>> {
    let user_id = claims.user_id()?;
    Ok(Json(
        address_service::set_pickup_address(&state, user_id, id).await?,
    ))
}

pub async fn delete_address(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let user_id = claims.user_id()?;
    address_service::delete_address(&state, user_id, id).await?;
    Ok(Json(json!({ "message": "Address deleted" })))
}
