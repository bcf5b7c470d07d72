pub mod category;
pub mod city;
pub mod discussion;
pub mod discussion_reply;
pub mod district;
pub mod marketplace_banner;
pub mod marketplace_voucher;
pub mod product;
pub mod province;
pub mod shop;
pub mod sku;
pub mod sku_variant;
pub mod subdistrict;
pub mod user;
pub mod user_address;
pub mod variant;
pub mod variant_group;
