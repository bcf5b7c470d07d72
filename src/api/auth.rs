use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::api::error::ApiResult;
use crate::domain::User;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::user_service::{
    self, AuthResponse, LoginInput, ProfileUpdate, RegisterInput,
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> ApiResult<impl IntoResponse> {
    let response = user_service::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginInput>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(user_service::login(&state, payload).await?))
}

pub async fn get_me(State(state): State<AppState>, claims: Claims) -> ApiResult<Json<User>> {
    let user_id = claims.user_id()?;
    Ok(Json(user_service::get_profile(&state, user_id).await?))
}

pub async fn update_me(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<Json<User>> {
    let user_id = claims.user_id()?;
    Ok(Json(
        user_service::update_profile(&state, user_id, payload).await?,
    ))
}
