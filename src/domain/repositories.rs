//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;
use super::pagination::{PageRequest, Paginated};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Province {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct City {
    pub id: i32,
    pub province_id: i32,
    pub name: String,
    /// `kota` or `kabupaten`
    pub city_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct District {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Subdistrict {
    pub id: i32,
    pub district_id: i32,
    pub name: String,
    pub postal_code: String,
}

/// Read-only access to the province > city > district > subdistrict tree
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_provinces(&self) -> Result<Vec<Province>, DomainError>;

    async fn find_province(&self, id: i32) -> Result<Option<Province>, DomainError>;

    async fn find_cities_by_province(&self, province_id: i32) -> Result<Vec<City>, DomainError>;

    async fn find_city(&self, id: i32) -> Result<Option<City>, DomainError>;

    async fn find_districts_by_city(&self, city_id: i32) -> Result<Vec<District>, DomainError>;

    async fn find_district(&self, id: i32) -> Result<Option<District>, DomainError>;

    async fn find_subdistricts_by_district(
        &self,
        district_id: i32,
    ) -> Result<Vec<Subdistrict>, DomainError>;

    async fn find_subdistrict(&self, id: i32) -> Result<Option<Subdistrict>, DomainError>;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Public view of a user account (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Look a user up by email or username
    async fn find_credentials(&self, identifier: &str)
    -> Result<Option<UserCredentials>, DomainError>;

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;

    async fn username_exists(&self, username: &str) -> Result<bool, DomainError>;

    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    async fn update_profile(
        &self,
        id: i32,
        full_name: Option<String>,
        phone: Option<Option<String>>,
    ) -> Result<User, DomainError>;
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: i32,
    pub user_id: i32,
    pub label: String,
    pub recipient_name: String,
    pub phone: String,
    pub province_id: i32,
    pub province_name: Option<String>,
    pub city_id: i32,
    pub city_name: Option<String>,
    pub district_id: i32,
    pub district_name: Option<String>,
    pub subdistrict_id: i32,
    pub subdistrict_name: Option<String>,
    pub postal_code: String,
    pub detail: String,
    pub is_default: bool,
    pub is_pickup: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub label: String,
    pub recipient_name: String,
    pub phone: String,
    pub province_id: i32,
    pub city_id: i32,
    pub district_id: i32,
    pub subdistrict_id: i32,
    pub postal_code: String,
    pub detail: String,
    pub is_default: bool,
    pub is_pickup: bool,
}

/// Partial update. Flags are only ever raised here: lowering a flag happens
/// implicitly when another address takes it over.
#[derive(Debug, Clone, Default)]
pub struct AddressChanges {
    pub label: Option<String>,
    pub recipient_name: Option<String>,
    pub phone: Option<String>,
    pub province_id: Option<i32>,
    pub city_id: Option<i32>,
    pub district_id: Option<i32>,
    pub subdistrict_id: Option<i32>,
    pub postal_code: Option<String>,
    pub detail: Option<String>,
    pub make_default: bool,
    pub make_pickup: bool,
}

/// Address persistence. Every write runs in a single transaction that keeps
/// exactly one default and one pickup address per user.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Live addresses, default first then newest
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Address>, DomainError>;

    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Address>, DomainError>;

    /// Insert an address; the user's first address always takes both flags
    async fn create(&self, user_id: i32, input: NewAddress) -> Result<Address, DomainError>;

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        changes: AddressChanges,
    ) -> Result<Address, DomainError>;

    /// Soft delete; flags held by the row move to the oldest remaining address
    async fn delete(&self, user_id: i32, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Shops
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Shop>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Shop>, DomainError>;

    async fn find_by_user(&self, user_id: i32) -> Result<Option<Shop>, DomainError>;

    async fn find_by_ids(&self, ids: Vec<i32>) -> Result<HashMap<i32, Shop>, DomainError>;

    async fn create(
        &self,
        user_id: i32,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<Shop, DomainError>;
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub icon_url: Option<String>,
}

/// A category with its nested subtree and the cheapest SKU price under it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub icon_url: Option<String>,
    pub min_price: Option<f64>,
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<Option<i32>>,
    pub icon_url: Option<Option<String>>,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;

    async fn slug_exists(&self, slug: &str, except: Option<i32>) -> Result<bool, DomainError>;

    async fn create(
        &self,
        parent_id: Option<i32>,
        name: String,
        slug: String,
        icon_url: Option<String>,
    ) -> Result<Category, DomainError>;

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn count_children(&self, id: i32) -> Result<u64, DomainError>;

    async fn count_products(&self, id: i32) -> Result<u64, DomainError>;

    /// Cheapest SKU price of active products, keyed by their direct category
    async fn min_prices(&self) -> Result<HashMap<i32, f64>, DomainError>;
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Already expanded to include descendant categories
    pub category_ids: Option<Vec<i32>>,
    pub shop_id: Option<i32>,
    pub query: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: ProductSort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i32,
    pub shop_id: i32,
    pub shop_name: Option<String>,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub name: String,
    pub slug: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub total_stock: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub shop_id: i32,
    pub category_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    pub id: i32,
    pub product_id: i32,
    pub code: String,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
    /// Variant names, one per variant group
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantGroup {
    pub id: i32,
    pub name: String,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub skus: Vec<Sku>,
    pub variant_groups: Vec<VariantGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVariantGroup {
    pub name: String,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSku {
    pub code: String,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: i32,
    pub category_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub variant_groups: Vec<NewVariantGroup>,
    pub skus: Vec<NewSku>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub category_id: Option<i32>,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Active products only
    async fn find_page(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Paginated<ProductSummary>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, DomainError>;

    async fn find_detail(&self, id: i32) -> Result<Option<ProductDetail>, DomainError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, DomainError>;

    async fn create(&self, product: NewProduct) -> Result<ProductDetail, DomainError>;

    async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn find_sku(&self, id: i32) -> Result<Option<Sku>, DomainError>;

    async fn update_sku(
        &self,
        id: i32,
        price: Option<f64>,
        stock: Option<i32>,
    ) -> Result<Sku, DomainError>;
}

// ---------------------------------------------------------------------------
// Discussions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionReply {
    pub id: i32,
    pub discussion_id: i32,
    pub user_id: i32,
    pub username: Option<String>,
    pub content: String,
    pub is_seller: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub username: Option<String>,
    pub content: String,
    pub created_at: String,
    pub replies: Vec<DiscussionReply>,
}

#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    /// Newest threads first, each with its live replies oldest first
    async fn find_page_by_product(
        &self,
        product_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Discussion>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Discussion>, DomainError>;

    async fn create(
        &self,
        product_id: i32,
        user_id: i32,
        content: String,
    ) -> Result<Discussion, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn find_reply(&self, id: i32) -> Result<Option<DiscussionReply>, DomainError>;

    async fn create_reply(
        &self,
        discussion_id: i32,
        user_id: i32,
        content: String,
        is_seller: bool,
    ) -> Result<DiscussionReply, DomainError>;

    async fn delete_reply(&self, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Marketplace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Nominal,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Nominal => "nominal",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "nominal" => Ok(DiscountType::Nominal),
            other => Err(DomainError::validation(format!(
                "unknown discount_type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_purchase: f64,
    pub max_discount: Option<f64>,
    pub quota: i32,
    pub used: i32,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_purchase: f64,
    pub max_discount: Option<f64>,
    pub quota: i32,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct VoucherChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub min_purchase: Option<f64>,
    pub max_discount: Option<Option<f64>>,
    pub quota: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub id: i32,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewBanner {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BannerChanges {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[async_trait]
pub trait MarketplaceRepository: Send + Sync {
    /// Vouchers valid on `today` (YYYY-MM-DD) with quota left
    async fn find_active_vouchers(&self, today: &str) -> Result<Vec<Voucher>, DomainError>;

    async fn find_voucher(&self, id: i32) -> Result<Option<Voucher>, DomainError>;

    async fn find_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, DomainError>;

    async fn voucher_code_exists(&self, code: &str) -> Result<bool, DomainError>;

    async fn create_voucher(&self, voucher: NewVoucher) -> Result<Voucher, DomainError>;

    async fn update_voucher(
        &self,
        id: i32,
        changes: VoucherChanges,
    ) -> Result<Voucher, DomainError>;

    async fn delete_voucher(&self, id: i32) -> Result<(), DomainError>;

    async fn find_banners(&self, active_only: bool) -> Result<Vec<Banner>, DomainError>;

    async fn create_banner(&self, banner: NewBanner) -> Result<Banner, DomainError>;

    async fn update_banner(&self, id: i32, changes: BannerChanges)
    -> Result<Banner, DomainError>;

    async fn delete_banner(&self, id: i32) -> Result<(), DomainError>;
}
