use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "marketplace_vouchers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Stored upper-cased
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// `percentage` or `nominal`
    pub discount_type: String,
    pub discount_value: f64,
    pub min_purchase: f64,
    pub max_discount: Option<f64>,
    pub quota: i32,
    pub used: i32,
    /// YYYY-MM-DD, inclusive
    pub start_date: String,
    /// YYYY-MM-DD, inclusive
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
