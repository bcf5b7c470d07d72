//! Location Service - province / city / district / subdistrict lookups
//!
//! Every list is cache-aside: the cache is consulted first and filled from
//! the repository on a miss.

use crate::domain::{City, District, DomainError, Province, Subdistrict};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::{get_json, keys, set_json};

pub async fn list_provinces(state: &AppState) -> Result<Vec<Province>, DomainError> {
    if let Some(cached) = get_json(state.cache.as_ref(), keys::PROVINCES).await {
        return Ok(cached);
    }

    let provinces = state.location_repo.find_provinces().await?;
    set_json(
        state.cache.as_ref(),
        keys::PROVINCES,
        &provinces,
        state.cache_ttl,
    )
    .await;
    Ok(provinces)
}

pub async fn list_cities(state: &AppState, province_id: i32) -> Result<Vec<City>, DomainError> {
    let key = keys::cities(province_id);
    if let Some(cached) = get_json(state.cache.as_ref(), &key).await {
        return Ok(cached);
    }

    state
        .location_repo
        .find_province(province_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    let cities = state
        .location_repo
        .find_cities_by_province(province_id)
        .await?;
    set_json(state.cache.as_ref(), &key, &cities, state.cache_ttl).await;
    Ok(cities)
}

pub async fn list_districts(state: &AppState, city_id: i32) -> Result<Vec<District>, DomainError> {
    let key = keys::districts(city_id);
    if let Some(cached) = get_json(state.cache.as_ref(), &key).await {
        return Ok(cached);
    }

    state
        .location_repo
        .find_city(city_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    let districts = state.location_repo.find_districts_by_city(city_id).await?;
    set_json(state.cache.as_ref(), &key, &districts, state.cache_ttl).await;
    Ok(districts)
}

pub async fn list_subdistricts(
    state: &AppState,
    district_id: i32,
) -> Result<Vec<Subdistrict>, DomainError> {
    let key = keys::subdistricts(district_id);
    if let Some(cached) = get_json(state.cache.as_ref(), &key).await {
        return Ok(cached);
    }

    state
        .location_repo
        .find_district(district_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    let subdistricts = state
        .location_repo
        .find_subdistricts_by_district(district_id)
        .await?;
    set_json(state.cache.as_ref(), &key, &subdistricts, state.cache_ttl).await;
    Ok(subdistricts)
}

pub async fn get_subdistrict(state: &AppState, id: i32) -> Result<Subdistrict, DomainError> {
    state
        .location_repo
        .find_subdistrict(id)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Check that each level belongs to the one above it.
///
/// Returns the subdistrict so callers can default the postal code.
pub async fn validate_hierarchy(
    state: &AppState,
    province_id: i32,
    city_id: i32,
    district_id: i32,
    subdistrict_id: i32,
) -> Result<Subdistrict, DomainError> {
    let repo = &state.location_repo;

    repo.find_province(province_id)
        .await?
        .ok_or_else(|| DomainError::validation("province_id does not exist"))?;

    let city = repo
        .find_city(city_id)
        .await?
        .ok_or_else(|| DomainError::validation("city_id does not exist"))?;
    if city.province_id != province_id {
        return Err(DomainError::validation(
            "city_id does not belong to province_id",
        ));
    }

    let district = repo
        .find_district(district_id)
        .await?
        .ok_or_else(|| DomainError::validation("district_id does not exist"))?;
    if district.city_id != city_id {
        return Err(DomainError::validation(
            "district_id does not belong to city_id",
        ));
    }

    let subdistrict = repo
        .find_subdistrict(subdistrict_id)
        .await?
        .ok_or_else(|| DomainError::validation("subdistrict_id does not exist"))?;
    if subdistrict.district_id != district_id {
        return Err(DomainError::validation(
            "subdistrict_id does not belong to district_id",
        ));
    }

    Ok(subdistrict)
}
