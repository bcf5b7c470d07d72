use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::error::ApiResult;
use crate::domain::{City, District, Province, Subdistrict};
use crate::infrastructure::AppState;
use crate::services::location_service;

#[utoipa::path(
    get,
    path = "/api/locations/provinces",
    responses(
        (status = 200, description = "All provinces, by name", body = [Province])
    )
)]
pub async fn list_provinces(State(state): State<AppState>) -> ApiResult<Json<Vec<Province>>> {
    Ok(Json(location_service::list_provinces(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/provinces/{id}/cities",
    params(("id" = i32, Path, description = "Province id")),
    responses(
        (status = 200, description = "Cities of the province", body = [City]),
        (status = 404, description = "Unknown province")
    )
)]
pub async fn list_cities(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<City>>> {
    Ok(Json(location_service::list_cities(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/cities/{id}/districts",
    params(("id" = i32, Path, description = "City id")),
    responses(
        (status = 200, description = "Districts of the city", body = [District]),
        (status = 404, description = "Unknown city")
    )
)]
pub async fn list_districts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<District>>> {
    Ok(Json(location_service::list_districts(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/districts/{id}/subdistricts",
    params(("id" = i32, Path, description = "District id")),
    responses(
        (status = 200, description = "Subdistricts of the district", body = [Subdistrict]),
        (status = 404, description = "Unknown district")
    )
)]
pub async fn list_subdistricts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<Subdistrict>>> {
    Ok(Json(location_service::list_subdistricts(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/subdistricts/{id}",
    params(("id" = i32, Path, description = "Subdistrict id")),
    responses(
        (status = 200, description = "One subdistrict", body = Subdistrict),
        (status = 404, description = "Unknown subdistrict")
    )
)]
pub async fn get_subdistrict(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Subdistrict>> {
    Ok(Json(location_service::get_subdistrict(&state, id).await?))
}
