//! Address Service - user addresses and the default / pickup flags
//!
//! A user with at least one live address always has exactly one default and
//! exactly one pickup address. The repository keeps that true inside each
//! transaction; this layer validates input and rejects requests that would
//! leave a flag without a holder.

use serde::Deserialize;

use crate::domain::validation::{validate_phone, validate_text};
use crate::domain::{Address, AddressChanges, DomainError, NewAddress, Validate};
use crate::infrastructure::AppState;
use crate::services::location_service;

#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub label: String,
    pub recipient_name: String,
    pub phone: String,
    pub province_id: i32,
    pub city_id: i32,
    pub district_id: i32,
    pub subdistrict_id: i32,
    /// Falls back to the subdistrict's postal code
    pub postal_code: Option<String>,
    pub detail: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_pickup: bool,
}

impl Validate for AddressInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_text("label", &self.label, 1, 50)?;
        validate_text("recipient_name", &self.recipient_name, 1, 100)?;
        validate_phone("phone", self.phone.trim())?;
        validate_text("detail", &self.detail, 5, 500)?;
        if let Some(postal_code) = &self.postal_code {
            validate_postal_code(postal_code)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressUpdate {
    pub label: Option<String>,
    pub recipient_name: Option<String>,
    pub phone: Option<String>,
    pub province_id: Option<i32>,
    pub city_id: Option<i32>,
    pub district_id: Option<i32>,
    pub subdistrict_id: Option<i32>,
    pub postal_code: Option<String>,
    pub detail: Option<String>,
    pub is_default: Option<bool>,
    pub is_pickup: Option<bool>,
}

impl AddressUpdate {
    fn touches_location(&self) -> bool {
        self.province_id.is_some()
            || self.city_id.is_some()
            || self.district_id.is_some()
            || self.subdistrict_id.is_some()
    }
}

impl Validate for AddressUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(label) = &self.label {
            validate_text("label", label, 1, 50)?;
        }
        if let Some(recipient_name) = &self.recipient_name {
            validate_text("recipient_name", recipient_name, 1, 100)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone("phone", phone.trim())?;
        }
        if let Some(detail) = &self.detail {
            validate_text("detail", detail, 5, 500)?;
        }
        if let Some(postal_code) = &self.postal_code {
            validate_postal_code(postal_code)?;
        }
        Ok(())
    }
}

fn validate_postal_code(value: &str) -> Result<(), DomainError> {
    if value.len() != 5 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("postal_code must be 5 digits"));
    }
    Ok(())
}

/// A flag may only be lowered by handing it to another address
fn check_flag_release(
    flag: &str,
    currently_held: bool,
    requested: Option<bool>,
) -> Result<bool, DomainError> {
    match requested {
        Some(false) if currently_held => Err(DomainError::validation(format!(
            "{} cannot be unset; mark another address as {} instead",
            flag,
            flag.trim_start_matches("is_")
        ))),
        Some(true) => Ok(!currently_held),
        _ => Ok(false),
    }
}

pub async fn list_addresses(state: &AppState, user_id: i32) -> Result<Vec<Address>, DomainError> {
    state.address_repo.find_by_user(user_id).await
}

pub async fn get_address(state: &AppState, user_id: i32, id: i32) -> Result<Address, DomainError> {
    state
        .address_repo
        .find_by_id(user_id, id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn create_address(
    state: &AppState,
    user_id: i32,
    input: AddressInput,
) -> Result<Address, DomainError> {
    input.validate()?;

    let subdistrict = location_service::validate_hierarchy(
        state,
        input.province_id,
        input.city_id,
        input.district_id,
        input.subdistrict_id,
    )
    .await?;

    state
        .address_repo
        .create(
            user_id,
            NewAddress {
                label: input.label.trim().to_string(),
                recipient_name: input.recipient_name.trim().to_string(),
                phone: input.phone.trim().to_string(),
                province_id: input.province_id,
                city_id: input.city_id,
                district_id: input.district_id,
                subdistrict_id: input.subdistrict_id,
                postal_code: input.postal_code.unwrap_or(subdistrict.postal_code),
                detail: input.detail.trim().to_string(),
                is_default: input.is_default,
                is_pickup: input.is_pickup,
            },
        )
        .await
}

pub async fn update_address(
    state: &AppState,
    user_id: i32,
    id: i32,
    input: AddressUpdate,
) -> Result<Address, DomainError> {
    input.validate()?;

    let existing = get_address(state, user_id, id).await?;
    let make_default = check_flag_release("is_default", existing.is_default, input.is_default)?;
    let make_pickup = check_flag_release("is_pickup", existing.is_pickup, input.is_pickup)?;

    let mut postal_code = input.postal_code.clone();
    if input.touches_location() {
        let subdistrict = location_service::validate_hierarchy(
            state,
            input.province_id.unwrap_or(existing.province_id),
            input.city_id.unwrap_or(existing.city_id),
            input.district_id.unwrap_or(existing.district_id),
            input.subdistrict_id.unwrap_or(existing.subdistrict_id),
        )
        .await?;
        // a move to another subdistrict takes its postal code unless one is given
        if postal_code.is_none() && subdistrict.id != existing.subdistrict_id {
            postal_code = Some(subdistrict.postal_code);
        }
    }

    let changes = AddressChanges {
        label: input.label.map(|v| v.trim().to_string()),
        recipient_name: input.recipient_name.map(|v| v.trim().to_string()),
        phone: input.phone.map(|v| v.trim().to_string()),
        province_id: input.province_id,
        city_id: input.city_id,
        district_id: input.district_id,
        subdistrict_id: input.subdistrict_id,
        postal_code,
        detail: input.detail.map(|v| v.trim().to_string()),
        make_default,
        make_pickup,
    };
    state.address_repo.update(user_id, id, changes).await
}

pub async fn set_default_address(
    state: &AppState,
    user_id: i32,
    id: i32,
) -> Result<Address, DomainError> {
    let changes = AddressChanges {
        make_default: true,
        ..Default::default()
    };
    state.address_repo.update(user_id, id, changes).await
}

pub async fn set_pickup_address(
    state: &AppState,
    user_id: i32,
    id: i32,
) -> Result<Address, DomainError> {
    let changes = AddressChanges {
        make_pickup: true,
        ..Default::default()
    };
    state.address_repo.update(user_id, id, changes).await
}

pub async fn delete_address(state: &AppState, user_id: i32, id: i32) -> Result<(), DomainError> {
    state.address_repo.delete(user_id, id).await?;
    tracing::info!("User {} deleted address {}", user_id, id);
    Ok(())
}
