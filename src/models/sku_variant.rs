use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sku_variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sku_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub variant_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sku::Entity",
        from = "Column::SkuId",
        to = "super::sku::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Sku,
    #[sea_orm(
        belongs_to = "super::variant::Entity",
        from = "Column::VariantId",
        to = "super::variant::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Variant,
}

impl Related<super::sku::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sku.def()
    }
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
