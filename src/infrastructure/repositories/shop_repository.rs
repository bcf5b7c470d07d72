//! SeaORM implementation of ShopRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{DomainError, Shop, ShopRepository};
use crate::models::shop::{ActiveModel, Column, Entity as ShopEntity};

/// SeaORM-based implementation of ShopRepository
pub struct SeaOrmShopRepository {
    db: DatabaseConnection,
}

impl SeaOrmShopRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShopRepository for SeaOrmShopRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Shop>, DomainError> {
        let shop = ShopEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(shop.map(Shop::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Shop>, DomainError> {
        let shop = ShopEntity::find()
            .filter(Column::Slug.eq(slug))
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(shop.map(Shop::from))
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Option<Shop>, DomainError> {
        let shop = ShopEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(shop.map(Shop::from))
    }

    async fn find_by_ids(&self, ids: Vec<i32>) -> Result<HashMap<i32, Shop>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let shops = ShopEntity::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(shops.into_iter().map(|s| (s.id, Shop::from(s))).collect())
    }

    async fn create(
        &self,
        user_id: i32,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<Shop, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_shop = ActiveModel {
            user_id: Set(user_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = new_shop.insert(&self.db).await?;
        Ok(Shop::from(result))
    }
}
