//! Shop Service - one shop per seller

use serde::Deserialize;

use crate::domain::validation::{slugify, validate_optional_text, validate_text};
use crate::domain::{
    DomainError, PageRequest, Paginated, ProductFilter, ProductSummary, Shop, Validate,
};
use crate::infrastructure::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ShopInput {
    pub name: String,
    pub description: Option<String>,
}

impl Validate for ShopInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_text("name", &self.name, 3, 60)?;
        validate_optional_text("description", self.description.as_deref(), 1000)?;
        Ok(())
    }
}

/// Open a shop for `user_id`.
///
/// Couriers collect parcels from the seller's pickup address, so one must
/// exist before the shop does.
pub async fn create_shop(
    state: &AppState,
    user_id: i32,
    input: ShopInput,
) -> Result<Shop, DomainError> {
    input.validate()?;

    if state.shop_repo.find_by_user(user_id).await?.is_some() {
        return Err(DomainError::conflict("user already owns a shop"));
    }

    let has_pickup = state
        .address_repo
        .find_by_user(user_id)
        .await?
        .iter()
        .any(|a| a.is_pickup);
    if !has_pickup {
        return Err(DomainError::validation(
            "a pickup address is required before opening a shop",
        ));
    }

    let slug = slugify(&input.name);
    if slug.is_empty() {
        return Err(DomainError::validation("name must contain letters or digits"));
    }
    if state.shop_repo.find_by_slug(&slug).await?.is_some() {
        return Err(DomainError::conflict(format!(
            "shop name '{}' is already taken",
            input.name.trim()
        )));
    }

    let description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let shop = state
        .shop_repo
        .create(user_id, input.name.trim().to_string(), slug, description)
        .await?;

    tracing::info!("User {} opened shop {} ({})", user_id, shop.slug, shop.id);
    Ok(shop)
}

pub async fn get_shop(state: &AppState, id: i32) -> Result<Shop, DomainError> {
    state
        .shop_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn get_shop_by_slug(state: &AppState, slug: &str) -> Result<Shop, DomainError> {
    state
        .shop_repo
        .find_by_slug(slug)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn get_my_shop(state: &AppState, user_id: i32) -> Result<Shop, DomainError> {
    state
        .shop_repo
        .find_by_user(user_id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn list_shop_products(
    state: &AppState,
    shop_id: i32,
    page: PageRequest,
) -> Result<Paginated<ProductSummary>, DomainError> {
    let filter = ProductFilter {
        shop_id: Some(shop_id),
        ..Default::default()
    };
    state.product_repo.find_page(filter, page).await
}
