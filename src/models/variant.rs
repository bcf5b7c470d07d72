use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub variant_group_id: i32,
    pub name: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::variant_group::Entity",
        from = "Column::VariantGroupId",
        to = "super::variant_group::Column::Id"
    )]
    VariantGroup,
}

impl Related<super::variant_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariantGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
