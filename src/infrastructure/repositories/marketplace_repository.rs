//! SeaORM implementation of MarketplaceRepository (vouchers and banners)

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    Banner, BannerChanges, DomainError, MarketplaceRepository, NewBanner, NewVoucher, Voucher,
    VoucherChanges,
};
use crate::models::marketplace_banner::{self, Entity as BannerEntity};
use crate::models::marketplace_voucher::{self, Entity as VoucherEntity};

/// SeaORM-based implementation of MarketplaceRepository
pub struct SeaOrmMarketplaceRepository {
    db: DatabaseConnection,
}

impl SeaOrmMarketplaceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TryFrom<marketplace_voucher::Model> for Voucher {
    type Error = DomainError;

    fn try_from(model: marketplace_voucher::Model) -> Result<Self, Self::Error> {
        let discount_type = model.discount_type.parse().map_err(|_| {
            DomainError::Internal(format!(
                "voucher {} has unknown discount_type '{}'",
                model.id, model.discount_type
            ))
        })?;

        Ok(Voucher {
            id: model.id,
            code: model.code,
            name: model.name,
            description: model.description,
            discount_type,
            discount_value: model.discount_value,
            min_purchase: model.min_purchase,
            max_discount: model.max_discount,
            quota: model.quota,
            used: model.used,
            start_date: model.start_date,
            end_date: model.end_date,
        })
    }
}

async fn find_live_voucher(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<marketplace_voucher::Model>, DomainError> {
    Ok(VoucherEntity::find_by_id(id)
        .filter(marketplace_voucher::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

async fn find_live_banner(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<marketplace_banner::Model>, DomainError> {
    Ok(BannerEntity::find_by_id(id)
        .filter(marketplace_banner::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

#[async_trait]
impl MarketplaceRepository for SeaOrmMarketplaceRepository {
    async fn find_active_vouchers(&self, today: &str) -> Result<Vec<Voucher>, DomainError> {
        let models = VoucherEntity::find()
            .filter(marketplace_voucher::Column::DeletedAt.is_null())
            .filter(marketplace_voucher::Column::StartDate.lte(today))
            .filter(marketplace_voucher::Column::EndDate.gte(today))
            .order_by_asc(marketplace_voucher::Column::EndDate)
            .order_by_asc(marketplace_voucher::Column::Id)
            .all(&self.db)
            .await?;

        // quota comparison is between two columns, done after the fetch
        models
            .into_iter()
            .filter(|m| m.used < m.quota)
            .map(Voucher::try_from)
            .collect()
    }

    async fn find_voucher(&self, id: i32) -> Result<Option<Voucher>, DomainError> {
        find_live_voucher(&self.db, id)
            .await?
            .map(Voucher::try_from)
            .transpose()
    }

    async fn find_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, DomainError> {
        VoucherEntity::find()
            .filter(marketplace_voucher::Column::Code.eq(code.to_uppercase()))
            .filter(marketplace_voucher::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(Voucher::try_from)
            .transpose()
    }

    async fn voucher_code_exists(&self, code: &str) -> Result<bool, DomainError> {
        let count = VoucherEntity::find()
            .filter(marketplace_voucher::Column::Code.eq(code.to_uppercase()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create_voucher(&self, voucher: NewVoucher) -> Result<Voucher, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let model = marketplace_voucher::ActiveModel {
            code: Set(voucher.code.to_uppercase()),
            name: Set(voucher.name),
            description: Set(voucher.description),
            discount_type: Set(voucher.discount_type.as_str().to_string()),
            discount_value: Set(voucher.discount_value),
            min_purchase: Set(voucher.min_purchase),
            max_discount: Set(voucher.max_discount),
            quota: Set(voucher.quota),
            used: Set(0),
            start_date: Set(voucher.start_date),
            end_date: Set(voucher.end_date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!("Created voucher {} ({})", model.code, model.id);
        Voucher::try_from(model)
    }

    async fn update_voucher(
        &self,
        id: i32,
        changes: VoucherChanges,
    ) -> Result<Voucher, DomainError> {
        let existing = find_live_voucher(&self.db, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: marketplace_voucher::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(discount_type) = changes.discount_type {
            active.discount_type = Set(discount_type.as_str().to_string());
        }
        if let Some(discount_value) = changes.discount_value {
            active.discount_value = Set(discount_value);
        }
        if let Some(min_purchase) = changes.min_purchase {
            active.min_purchase = Set(min_purchase);
        }
        if let Some(max_discount) = changes.max_discount {
            active.max_discount = Set(max_discount);
        }
        if let Some(quota) = changes.quota {
            active.quota = Set(quota);
        }
        if let Some(start_date) = changes.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = changes.end_date {
            active.end_date = Set(end_date);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Voucher::try_from(model)
    }

    async fn delete_voucher(&self, id: i32) -> Result<(), DomainError> {
        let existing = find_live_voucher(&self.db, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: marketplace_voucher::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn find_banners(&self, active_only: bool) -> Result<Vec<Banner>, DomainError> {
        let mut query = BannerEntity::find().filter(marketplace_banner::Column::DeletedAt.is_null());
        if active_only {
            query = query.filter(marketplace_banner::Column::IsActive.eq(true));
        }

        let banners = query
            .order_by_asc(marketplace_banner::Column::SortOrder)
            .order_by_asc(marketplace_banner::Column::Id)
            .all(&self.db)
            .await?;
        Ok(banners.into_iter().map(Banner::from).collect())
    }

    async fn create_banner(&self, banner: NewBanner) -> Result<Banner, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let model = marketplace_banner::ActiveModel {
            title: Set(banner.title),
            image_url: Set(banner.image_url),
            link_url: Set(banner.link_url),
            sort_order: Set(banner.sort_order),
            is_active: Set(banner.is_active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(Banner::from(model))
    }

    async fn update_banner(
        &self,
        id: i32,
        changes: BannerChanges,
    ) -> Result<Banner, DomainError> {
        let existing = find_live_banner(&self.db, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: marketplace_banner::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(link_url) = changes.link_url {
            active.link_url = Set(link_url);
        }
        if let Some(sort_order) = changes.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Ok(Banner::from(model))
    }

    async fn delete_banner(&self, id: i32) -> Result<(), DomainError> {
        let existing = find_live_banner(&self.db, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: marketplace_banner::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }
}
