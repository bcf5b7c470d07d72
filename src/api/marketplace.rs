use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::api::error::ApiResult;
use crate::domain::{Banner, Voucher};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::marketplace_service::{
    self, ApplyVoucherInput, BannerInput, BannerUpdate, VoucherApplication, VoucherInput,
    VoucherUpdate,
};

pub async fn list_active_vouchers(State(state): State<AppState>) -> ApiResult<Json<Vec<Voucher>>> {
    let today = marketplace_service::today();
    Ok(Json(
        marketplace_service::list_active_vouchers(&state, &today).await?,
    ))
}

pub async fn get_voucher(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Voucher>> {
    Ok(Json(
        marketplace_service::get_voucher_by_code(&state, &code).await?,
    ))
}

pub async fn apply_voucher(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<ApplyVoucherInput>,
) -> ApiResult<Json<VoucherApplication>> {
    let today = marketplace_service::today();
    Ok(Json(
        marketplace_service::apply_voucher(&state, &code, payload.purchase_amount, &today).await?,
    ))
}

pub async fn create_voucher(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<VoucherInput>,
) -> ApiResult<impl IntoResponse> {
    claims.require_admin()?;
    let voucher = marketplace_service::create_voucher(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(voucher)))
}

pub async fn update_voucher(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<VoucherUpdate>,
) -> ApiResult<Json<Voucher>> {
    claims.require_admin()?;
    Ok(Json(
        marketplace_service::update_voucher(&state, id, payload).await?,
    ))
}

pub async fn delete_voucher(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    claims.require_admin()?;
    marketplace_service::delete_voucher(&state, id).await?;
    Ok(Json(json!({ "message": "Voucher deleted" })))
}

pub async fn list_active_banners(State(state): State<AppState>) -> ApiResult<Json<Vec<Banner>>> {
    Ok(Json(marketplace_service::list_active_banners(&state).await?))
}

pub async fn list_all_banners(
    State(state): State<AppState>,
    claims: Claims,
) -> ApiResult<Json<Vec<Banner>>> {
    claims.require_admin()?;
    Ok(Json(marketplace_service::list_banners(&state).await?))
}

pub async fn create_banner(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<BannerInput>,
) -> ApiResult<impl IntoResponse> {
    claims.require_admin()?;
    let banner = marketplace_service::create_banner(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn update_banner(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<BannerUpdate>,
) -> ApiResult<Json<Banner>> {
    claims.require_admin()?;
    Ok(Json(
        marketplace_service::update_banner(&state, id, payload).await?,
    ))
}

pub async fn delete_banner(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    claims.require_admin()?;
    marketplace_service::delete_banner(&state, id).await?;
    Ok(Json(json!({ "message": "Banner deleted" })))
}
