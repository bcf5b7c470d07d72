//! Product Service - catalog listing, product detail and seller writes

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::validation::{slugify, validate_optional_text, validate_text};
use crate::domain::{
    Category, DomainError, NewProduct, NewSku, NewVariantGroup, PageRequest, Paginated, Product,
    ProductChanges, ProductDetail, ProductFilter, ProductSort, ProductSummary, Shop, Sku,
    Validate, VariantGroup,
};
use crate::infrastructure::AppState;
use crate::models::product::{STATUS_ACTIVE, STATUS_DRAFT};
use crate::services::{category_service, double_option};

const MAX_SKUS: usize = 100;

/// Query string of the product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<i32>,
    pub shop_id: Option<i32>,
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort: ProductSort,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ProductQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
        }
    }
}

impl Validate for ProductQuery {
    fn validate(&self) -> Result<(), DomainError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(DomainError::validation(
                "min_price must not exceed max_price",
            ));
        }
        if self.min_price.is_some_and(|p| p < 0.0) || self.max_price.is_some_and(|p| p < 0.0) {
            return Err(DomainError::validation("price filters must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// `active` (default) or `draft`
    pub status: Option<String>,
    #[serde(default)]
    pub variant_groups: Vec<NewVariantGroup>,
    pub skus: Vec<NewSku>,
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_text("name", &self.name, 3, 150)?;
        validate_optional_text("description", self.description.as_deref(), 5000)?;
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        validate_skus(&self.skus)?;
        validate_variant_matrix(&self.variant_groups, &self.skus)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub category_id: Option<i32>,
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_text("name", name, 3, 150)?;
        }
        if let Some(Some(description)) = &self.description {
            validate_optional_text("description", Some(description), 5000)?;
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkuUpdate {
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl Validate for SkuUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

/// Product detail as served to buyers
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub shop: Shop,
    pub lineage: Vec<Category>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub total_stock: i64,
    pub variant_groups: Vec<VariantGroup>,
    pub skus: Vec<Sku>,
}

fn validate_status(status: &str) -> Result<(), DomainError> {
    if status != STATUS_ACTIVE && status != STATUS_DRAFT {
        return Err(DomainError::validation(format!(
            "status must be '{}' or '{}'",
            STATUS_ACTIVE, STATUS_DRAFT
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(DomainError::validation("sku price must be greater than 0"));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), DomainError> {
    if stock < 0 {
        return Err(DomainError::validation("sku stock must not be negative"));
    }
    Ok(())
}

fn validate_skus(skus: &[NewSku]) -> Result<(), DomainError> {
    if skus.is_empty() {
        return Err(DomainError::validation("at least one sku is required"));
    }
    if skus.len() > MAX_SKUS {
        return Err(DomainError::validation(format!(
            "a product can have at most {} skus",
            MAX_SKUS
        )));
    }

    let mut codes = HashSet::new();
    for sku in skus {
        validate_text("sku code", &sku.code, 1, 50)?;
        if !codes.insert(sku.code.trim().to_lowercase()) {
            return Err(DomainError::validation(format!(
                "duplicate sku code '{}'",
                sku.code
            )));
        }
        validate_price(sku.price)?;
        validate_stock(sku.stock)?;
    }
    Ok(())
}

/// Every SKU picks exactly one variant from each group, and no two SKUs
/// share a combination. Without groups the product has a single SKU.
pub fn validate_variant_matrix(
    groups: &[NewVariantGroup],
    skus: &[NewSku],
) -> Result<(), DomainError> {
    if groups.is_empty() {
        if skus.len() > 1 || skus.iter().any(|s| !s.variants.is_empty()) {
            return Err(DomainError::validation(
                "products without variant groups have exactly one sku and no variants",
            ));
        }
        return Ok(());
    }

    let mut group_names = HashSet::new();
    // variant name (lowercased) -> owning group index
    let mut variant_group = std::collections::HashMap::new();
    for (index, group) in groups.iter().enumerate() {
        validate_text("variant group name", &group.name, 1, 30)?;
        if !group_names.insert(group.name.trim().to_lowercase()) {
            return Err(DomainError::validation(format!(
                "duplicate variant group '{}'",
                group.name
            )));
        }
        if group.variants.is_empty() {
            return Err(DomainError::validation(format!(
                "variant group '{}' has no variants",
                group.name
            )));
        }
        for variant in &group.variants {
            validate_text("variant name", variant, 1, 30)?;
            if variant_group
                .insert(variant.trim().to_lowercase(), index)
                .is_some()
            {
                return Err(DomainError::validation(format!(
                    "duplicate variant '{}'",
                    variant
                )));
            }
        }
    }

    let mut combinations = HashSet::new();
    for sku in skus {
        if sku.variants.len() != groups.len() {
            return Err(DomainError::validation(format!(
                "sku '{}' must pick one variant from each of the {} groups",
                sku.code,
                groups.len()
            )));
        }

        let mut picked = vec![None; groups.len()];
        for name in &sku.variants {
            let key = name.trim().to_lowercase();
            let group = *variant_group.get(&key).ok_or_else(|| {
                DomainError::validation(format!("sku '{}' uses unknown variant '{}'", sku.code, name))
            })?;
            if picked[group].replace(key).is_some() {
                return Err(DomainError::validation(format!(
                    "sku '{}' picks two variants from group '{}'",
                    sku.code, groups[group].name
                )));
            }
        }

        if !combinations.insert(picked) {
            return Err(DomainError::validation(format!(
                "sku '{}' repeats an existing variant combination",
                sku.code
            )));
        }
    }
    Ok(())
}

async fn unique_slug(state: &AppState, name: &str) -> Result<String, DomainError> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(DomainError::validation("name must contain letters or digits"));
    }

    let mut candidate = base.clone();
    let mut suffix = 2;
    while state.product_repo.slug_exists(&candidate).await? {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    Ok(candidate)
}

/// Category must exist and have no subcategories
async fn require_leaf_category(state: &AppState, category_id: i32) -> Result<(), DomainError> {
    state
        .category_repo
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| DomainError::validation("category_id does not exist"))?;
    if !category_service::is_leaf(state, category_id).await? {
        return Err(DomainError::validation(
            "products can only be placed in a leaf category",
        ));
    }
    Ok(())
}

/// Load a product and check it belongs to the shop of `user_id`
async fn owned_product(state: &AppState, user_id: i32, id: i32) -> Result<Product, DomainError> {
    let product = state
        .product_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;
    let shop = state.shop_repo.find_by_user(user_id).await?;
    match shop {
        Some(shop) if shop.id == product.shop_id => Ok(product),
        _ => Err(DomainError::Forbidden),
    }
}

async fn to_view(state: &AppState, detail: ProductDetail) -> Result<ProductView, DomainError> {
    let shop = state
        .shop_repo
        .find_by_id(detail.product.shop_id)
        .await?
        .ok_or_else(|| {
            DomainError::Internal(format!("product {} has no shop", detail.product.id))
        })?;
    let categories = state.category_repo.find_all().await?;
    let lineage = category_service::lineage(&categories, detail.product.category_id);

    let min_price = detail.skus.iter().map(|s| s.price).reduce(f64::min);
    let max_price = detail.skus.iter().map(|s| s.price).reduce(f64::max);
    let total_stock = detail.skus.iter().map(|s| i64::from(s.stock)).sum();

    Ok(ProductView {
        product: detail.product,
        shop,
        lineage,
        min_price,
        max_price,
        total_stock,
        variant_groups: detail.variant_groups,
        skus: detail.skus,
    })
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> Result<Paginated<ProductSummary>, DomainError> {
    query.validate()?;

    let category_ids = match query.category_id {
        Some(id) => Some(category_service::get_descendant_ids(state, id).await?),
        None => None,
    };
    let page = query.page_request();
    let filter = ProductFilter {
        category_ids,
        shop_id: query.shop_id,
        query: query.q,
        min_price: query.min_price,
        max_price: query.max_price,
        sort: query.sort,
    };

    tracing::debug!("List products: {:?}", filter);
    state.product_repo.find_page(filter, page).await
}

/// Buyer-facing detail; drafts are hidden
pub async fn get_product(state: &AppState, id: i32) -> Result<ProductView, DomainError> {
    let detail = state
        .product_repo
        .find_detail(id)
        .await?
        .filter(|d| d.product.status == STATUS_ACTIVE)
        .ok_or(DomainError::NotFound)?;
    to_view(state, detail).await
}

pub async fn get_product_by_slug(state: &AppState, slug: &str) -> Result<ProductView, DomainError> {
    let product = state
        .product_repo
        .find_by_slug(slug)
        .await?
        .ok_or(DomainError::NotFound)?;
    get_product(state, product.id).await
}

pub async fn create_product(
    state: &AppState,
    user_id: i32,
    input: ProductInput,
) -> Result<ProductView, DomainError> {
    input.validate()?;

    let shop = state
        .shop_repo
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| DomainError::validation("open a shop before listing products"))?;
    require_leaf_category(state, input.category_id).await?;

    let name = input.name.trim().to_string();
    let slug = unique_slug(state, &name).await?;
    let detail = state
        .product_repo
        .create(NewProduct {
            shop_id: shop.id,
            category_id: input.category_id,
            name,
            slug,
            description: input.description.filter(|d| !d.trim().is_empty()),
            status: input.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            variant_groups: input.variant_groups,
            skus: input.skus,
        })
        .await?;

    category_service::invalidate_tree(state).await;
    to_view(state, detail).await
}

pub async fn update_product(
    state: &AppState,
    user_id: i32,
    id: i32,
    input: ProductUpdate,
) -> Result<Product, DomainError> {
    input.validate()?;
    owned_product(state, user_id, id).await?;

    if let Some(category_id) = input.category_id {
        require_leaf_category(state, category_id).await?;
    }

    let product = state
        .product_repo
        .update(
            id,
            ProductChanges {
                name: input.name.map(|n| n.trim().to_string()),
                description: input.description,
                status: input.status,
                category_id: input.category_id,
            },
        )
        .await?;

    category_service::invalidate_tree(state).await;
    Ok(product)
}

pub async fn delete_product(state: &AppState, user_id: i32, id: i32) -> Result<(), DomainError> {
    owned_product(state, user_id, id).await?;
    state.product_repo.delete(id).await?;
    category_service::invalidate_tree(state).await;
    tracing::info!("User {} deleted product {}", user_id, id);
    Ok(())
}

pub async fn update_sku(
    state: &AppState,
    user_id: i32,
    sku_id: i32,
    input: SkuUpdate,
) -> Result<Sku, DomainError> {
    input.validate()?;

    let sku = state
        .product_repo
        .find_sku(sku_id)
        .await?
        .ok_or(DomainError::NotFound)?;
    owned_product(state, user_id, sku.product_id).await?;

    let sku = state
        .product_repo
        .update_sku(sku_id, input.price, input.stock)
        .await?;

    if input.price.is_some() {
        category_service::invalidate_tree(state).await;
    }
    Ok(sku)
}
