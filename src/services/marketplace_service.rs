//! Marketplace Service - platform vouchers and home-page banners

use serde::{Deserialize, Serialize};

use crate::domain::validation::{
    DATE_FORMAT, validate_date_range, validate_optional_text, validate_text,
};
use crate::domain::{
    Banner, BannerChanges, DiscountType, DomainError, NewBanner, NewVoucher, Validate, Voucher,
    VoucherChanges,
};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::{get_json, keys, set_json};
use crate::services::double_option;

/// Current calendar day as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoucherInput {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_purchase: f64,
    pub max_discount: Option<f64>,
    pub quota: i32,
    pub start_date: String,
    pub end_date: String,
}

impl Validate for VoucherInput {
    fn validate(&self) -> Result<(), DomainError> {
        let code = self.code.trim();
        if !(3..=20).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(
                "code must be 3 to 20 letters or digits",
            ));
        }
        validate_text("name", &self.name, 3, 100)?;
        validate_optional_text("description", self.description.as_deref(), 1000)?;
        validate_discount(self.discount_type, self.discount_value)?;
        if !self.min_purchase.is_finite() || self.min_purchase < 0.0 {
            return Err(DomainError::validation("min_purchase must not be negative"));
        }
        if let Some(max_discount) = self.max_discount
            && (!max_discount.is_finite() || max_discount <= 0.0)
        {
            return Err(DomainError::validation(
                "max_discount must be greater than 0",
            ));
        }
        if self.quota < 1 {
            return Err(DomainError::validation("quota must be at least 1"));
        }
        validate_date_range(&self.start_date, &self.end_date)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoucherUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub min_purchase: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_discount: Option<Option<f64>>,
    pub quota: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyVoucherInput {
    pub purchase_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoucherApplication {
    pub code: String,
    pub purchase_amount: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BannerInput {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Validate for BannerInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_text("title", &self.title, 3, 100)?;
        validate_url("image_url", &self.image_url)?;
        if let Some(link_url) = &self.link_url {
            validate_url("link_url", link_url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BannerUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub link_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Validate for BannerUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_text("title", title, 3, 100)?;
        }
        if let Some(image_url) = &self.image_url {
            validate_url("image_url", image_url)?;
        }
        if let Some(Some(link_url)) = &self.link_url {
            validate_url("link_url", link_url)?;
        }
        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), DomainError> {
    let value = value.trim();
    let is_http = value.starts_with("https://") || value.starts_with("http://");
    let is_path = value.starts_with('/') && value.len() > 1;
    if !(is_http || is_path) || value.chars().any(char::is_whitespace) {
        return Err(DomainError::validation(format!(
            "{} must be an http(s) URL or an absolute path",
            field
        )));
    }
    Ok(())
}

fn validate_discount(discount_type: DiscountType, value: f64) -> Result<(), DomainError> {
    match discount_type {
        DiscountType::Percentage if !(1.0..=100.0).contains(&value) => Err(
            DomainError::validation("percentage discount must be between 1 and 100"),
        ),
        DiscountType::Nominal if !value.is_finite() || value <= 0.0 => Err(
            DomainError::validation("nominal discount must be greater than 0"),
        ),
        _ => Ok(()),
    }
}

/// Discount granted on `amount`: percentages are capped by `max_discount`,
/// and no discount exceeds the purchase itself.
pub fn compute_discount(voucher: &Voucher, amount: f64) -> f64 {
    let raw = match voucher.discount_type {
        DiscountType::Percentage => {
            let discount = amount * voucher.discount_value / 100.0;
            match voucher.max_discount {
                Some(cap) => discount.min(cap),
                None => discount,
            }
        }
        DiscountType::Nominal => voucher.discount_value,
    };
    raw.clamp(0.0, amount.max(0.0))
}

/// Why a voucher cannot be used on `today` for `amount`, if anything
fn check_usable(voucher: &Voucher, amount: f64, today: &str) -> Result<(), DomainError> {
    if today < voucher.start_date.as_str() {
        return Err(DomainError::validation(format!(
            "voucher {} is not active until {}",
            voucher.code, voucher.start_date
        )));
    }
    if today > voucher.end_date.as_str() {
        return Err(DomainError::validation(format!(
            "voucher {} expired on {}",
            voucher.code, voucher.end_date
        )));
    }
    if voucher.used >= voucher.quota {
        return Err(DomainError::validation(format!(
            "voucher {} has been fully used",
            voucher.code
        )));
    }
    if amount < voucher.min_purchase {
        return Err(DomainError::validation(format!(
            "voucher {} requires a minimum purchase of {}",
            voucher.code, voucher.min_purchase
        )));
    }
    Ok(())
}

async fn invalidate_vouchers(state: &AppState) {
    state.cache.delete_prefix(keys::VOUCHERS_PREFIX).await;
}

async fn invalidate_banners(state: &AppState) {
    state.cache.delete(keys::ACTIVE_BANNERS).await;
}

// ---------------------------------------------------------------------------
// Vouchers
// ---------------------------------------------------------------------------

pub async fn list_active_vouchers(state: &AppState, today: &str) -> Result<Vec<Voucher>, DomainError> {
    let key = keys::active_vouchers(today);
    if let Some(cached) = get_json(state.cache.as_ref(), &key).await {
        return Ok(cached);
    }

    let vouchers = state.marketplace_repo.find_active_vouchers(today).await?;
    set_json(state.cache.as_ref(), &key, &vouchers, state.cache_ttl).await;
    Ok(vouchers)
}

pub async fn get_voucher_by_code(state: &AppState, code: &str) -> Result<Voucher, DomainError> {
    state
        .marketplace_repo
        .find_voucher_by_code(code.trim())
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn create_voucher(state: &AppState, input: VoucherInput) -> Result<Voucher, DomainError> {
    input.validate()?;

    let code = input.code.trim().to_uppercase();
    if state.marketplace_repo.voucher_code_exists(&code).await? {
        return Err(DomainError::conflict(format!(
            "voucher code {} already exists",
            code
        )));
    }

    let voucher = state
        .marketplace_repo
        .create_voucher(NewVoucher {
            code,
            name: input.name.trim().to_string(),
            description: input.description,
            discount_type: input.discount_type,
            discount_value: input.discount_value,
            min_purchase: input.min_purchase,
            max_discount: input.max_discount,
            quota: input.quota,
            start_date: input.start_date,
            end_date: input.end_date,
        })
        .await?;

    invalidate_vouchers(state).await;
    Ok(voucher)
}

/// Partial update; the merged voucher must pass the same checks as a new one
pub async fn update_voucher(
    state: &AppState,
    id: i32,
    input: VoucherUpdate,
) -> Result<Voucher, DomainError> {
    let existing = state
        .marketplace_repo
        .find_voucher(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    let merged = VoucherInput {
        code: existing.code.clone(),
        name: input.name.clone().unwrap_or(existing.name),
        description: input.description.clone().unwrap_or(existing.description),
        discount_type: input.discount_type.unwrap_or(existing.discount_type),
        discount_value: input.discount_value.unwrap_or(existing.discount_value),
        min_purchase: input.min_purchase.unwrap_or(existing.min_purchase),
        max_discount: input.max_discount.unwrap_or(existing.max_discount),
        quota: input.quota.unwrap_or(existing.quota),
        start_date: input.start_date.clone().unwrap_or(existing.start_date),
        end_date: input.end_date.clone().unwrap_or(existing.end_date),
    };
    merged.validate()?;
    if merged.quota < existing.used {
        return Err(DomainError::validation(format!(
            "quota cannot drop below the {} uses already made",
            existing.used
        )));
    }

    let voucher = state
        .marketplace_repo
        .update_voucher(
            id,
            VoucherChanges {
                name: input.name.map(|n| n.trim().to_string()),
                description: input.description,
                discount_type: input.discount_type,
                discount_value: input.discount_value,
                min_purchase: input.min_purchase,
                max_discount: input.max_discount,
                quota: input.quota,
                start_date: input.start_date,
                end_date: input.end_date,
            },
        )
        .await?;

    invalidate_vouchers(state).await;
    Ok(voucher)
}

pub async fn delete_voucher(state: &AppState, id: i32) -> Result<(), DomainError> {
    state.marketplace_repo.delete_voucher(id).await?;
    invalidate_vouchers(state).await;
    tracing::info!("Deleted voucher {}", id);
    Ok(())
}

/// Price a purchase with a voucher. Nothing is redeemed.
pub async fn apply_voucher(
    state: &AppState,
    code: &str,
    purchase_amount: f64,
    today: &str,
) -> Result<VoucherApplication, DomainError> {
    if !purchase_amount.is_finite() || purchase_amount <= 0.0 {
        return Err(DomainError::validation(
            "purchase_amount must be greater than 0",
        ));
    }

    let voucher = get_voucher_by_code(state, code).await?;
    check_usable(&voucher, purchase_amount, today)?;

    let discount = compute_discount(&voucher, purchase_amount);
    Ok(VoucherApplication {
        code: voucher.code,
        purchase_amount,
        discount,
        total: purchase_amount - discount,
    })
}

// ---------------------------------------------------------------------------
// Banners
// ---------------------------------------------------------------------------

pub async fn list_active_banners(state: &AppState) -> Result<Vec<Banner>, DomainError> {
    if let Some(cached) = get_json(state.cache.as_ref(), keys::ACTIVE_BANNERS).await {
        return Ok(cached);
    }

    let banners = state.marketplace_repo.find_banners(true).await?;
    set_json(
        state.cache.as_ref(),
        keys::ACTIVE_BANNERS,
        &banners,
        state.cache_ttl,
    )
    .await;
    Ok(banners)
}

pub async fn list_banners(state: &AppState) -> Result<Vec<Banner>, DomainError> {
    state.marketplace_repo.find_banners(false).await
}

pub async fn create_banner(state: &AppState, input: BannerInput) -> Result<Banner, DomainError> {
    input.validate()?;

    let banner = state
        .marketplace_repo
        .create_banner(NewBanner {
            title: input.title.trim().to_string(),
            image_url: input.image_url.trim().to_string(),
            link_url: input.link_url,
            sort_order: input.sort_order,
            is_active: input.is_active,
        })
        .await?;

    invalidate_banners(state).await;
    Ok(banner)
}

pub async fn update_banner(
    state: &AppState,
    id: i32,
    input: BannerUpdate,
) -> Result<Banner, DomainError> {
    input.validate()?;

    let banner = state
        .marketplace_repo
        .update_banner(
            id,
            BannerChanges {
                title: input.title.map(|t| t.trim().to_string()),
                image_url: input.image_url.map(|u| u.trim().to_string()),
                link_url: input.link_url,
                sort_order: input.sort_order,
                is_active: input.is_active,
            },
        )
        .await?;

    invalidate_banners(state).await;
    Ok(banner)
}

pub async fn delete_banner(state: &AppState, id: i32) -> Result<(), DomainError> {
    state.marketplace_repo.delete_banner(id).await?;
    invalidate_banners(state).await;
    Ok(())
}
