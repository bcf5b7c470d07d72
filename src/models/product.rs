use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_DRAFT: &str = "draft";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub shop_id: i32,
    pub category_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    /// `active` or `draft`. Only active products are listed.
    #[sea_orm(default_value = "active")]
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shop::Entity",
        from = "Column::ShopId",
        to = "super::shop::Column::Id"
    )]
    Shop,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::sku::Entity")]
    Skus,
    #[sea_orm(has_many = "super::variant_group::Entity")]
    VariantGroups,
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::sku::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skus.def()
    }
}

impl Related<super::variant_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariantGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            category_id: model.category_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
