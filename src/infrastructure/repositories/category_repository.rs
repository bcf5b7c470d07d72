//! SeaORM implementation of CategoryRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::domain::{Category, CategoryChanges, CategoryRepository, DomainError};
use crate::models::category::{ActiveModel, Column, Entity as CategoryEntity};
use crate::models::product::{self, Entity as ProductEntity};
use crate::models::sku::{self, Entity as SkuEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct CategoryMinPrice {
    category_id: i32,
    min_price: Option<f64>,
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(category.map(Category::from))
    }

    async fn slug_exists(&self, slug: &str, except: Option<i32>) -> Result<bool, DomainError> {
        // Soft-deleted rows still hold their slug in the unique index
        let mut query = CategoryEntity::find().filter(Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    async fn create(
        &self,
        parent_id: Option<i32>,
        name: String,
        slug: String,
        icon_url: Option<String>,
    ) -> Result<Category, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_category = ActiveModel {
            parent_id: Set(parent_id),
            name: Set(name),
            slug: Set(slug),
            icon_url: Set(icon_url),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = new_category.insert(&self.db).await?;
        Ok(Category::from(result))
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, DomainError> {
        let existing = CategoryEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(parent_id) = changes.parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(icon_url) = changes.icon_url {
            active.icon_url = Set(icon_url);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Category::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let existing = CategoryEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn count_children(&self, id: i32) -> Result<u64, DomainError> {
        let count = CategoryEntity::find()
            .filter(Column::ParentId.eq(id))
            .filter(Column::DeletedAt.is_null())
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_products(&self, id: i32) -> Result<u64, DomainError> {
        let count = ProductEntity::find()
            .filter(product::Column::CategoryId.eq(id))
            .filter(product::Column::DeletedAt.is_null())
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn min_prices(&self) -> Result<HashMap<i32, f64>, DomainError> {
        let rows = ProductEntity::find()
            .select_only()
            .column(product::Column::CategoryId)
            .column_as(Expr::col((SkuEntity, sku::Column::Price)).min(), "min_price")
            .join(JoinType::InnerJoin, product::Relation::Skus.def())
            .filter(product::Column::DeletedAt.is_null())
            .filter(sku::Column::DeletedAt.is_null())
            .filter(product::Column::Status.eq(product::STATUS_ACTIVE))
            .group_by(product::Column::CategoryId)
            .into_model::<CategoryMinPrice>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.min_price.map(|price| (row.category_id, price)))
            .collect())
    }
}
