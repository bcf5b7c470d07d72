use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub code: String,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(has_many = "super::sku_variant::Entity")]
    SkuVariant,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        super::sku_variant::Relation::Variant.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::sku_variant::Relation::Sku.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
