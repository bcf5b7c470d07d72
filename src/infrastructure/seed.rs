//! Reference and demo data
//!
//! Locations are seeded on every start when the table is empty. The demo
//! catalog (admin, a seller with a shop, categories, products, a voucher and
//! a banner) is only loaded when `SEED_DEMO` is set.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};

use crate::domain::{DiscountType, DomainError, NewSku, NewUser, NewVariantGroup};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{ROLE_ADMIN, hash_password};
use crate::models::{city, district, province, subdistrict};
use crate::services::address_service::{self, AddressInput};
use crate::services::category_service::{self, CategoryInput};
use crate::services::marketplace_service::{self, BannerInput, VoucherInput};
use crate::services::product_service::{self, ProductInput};
use crate::services::shop_service::{self, ShopInput};
use crate::services::user_service::{self, RegisterInput};

const PROVINCES: &[(i32, &str)] = &[(31, "DKI Jakarta"), (32, "Jawa Barat"), (34, "DI Yogyakarta")];

const CITIES: &[(i32, i32, &str, &str)] = &[
    (3171, 31, "Jakarta Selatan", "kota"),
    (3173, 31, "Jakarta Pusat", "kota"),
    (3273, 32, "Bandung", "kota"),
    (3204, 32, "Bandung", "kabupaten"),
    (3471, 34, "Yogyakarta", "kota"),
];

const DISTRICTS: &[(i32, i32, &str)] = &[
    (317101, 3171, "Kebayoran Baru"),
    (317102, 3171, "Tebet"),
    (317301, 3173, "Menteng"),
    (327301, 3273, "Coblong"),
    (320401, 3204, "Dayeuhkolot"),
    (347101, 3471, "Gondokusuman"),
];

const SUBDISTRICTS: &[(i32, i32, &str, &str)] = &[
    (3171011, 317101, "Senayan", "12190"),
    (3171012, 317101, "Melawai", "12160"),
    (3171021, 317102, "Tebet Barat", "12810"),
    (3173011, 317301, "Gondangdia", "10350"),
    (3273011, 327301, "Dago", "40135"),
    (3273012, 327301, "Lebak Siliwangi", "40132"),
    (3204011, 320401, "Citeureup", "40257"),
    (3471011, 347101, "Terban", "55223"),
];

/// Insert the province / city / district / subdistrict reference set once
pub async fn seed_locations(db: &DatabaseConnection) -> Result<(), DomainError> {
    if province::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let txn = db.begin().await?;
    for &(id, name) in PROVINCES {
        province::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
        }
        .insert(&txn)
        .await?;
    }
    for &(id, province_id, name, city_type) in CITIES {
        city::ActiveModel {
            id: Set(id),
            province_id: Set(province_id),
            name: Set(name.to_owned()),
            city_type: Set(city_type.to_owned()),
        }
        .insert(&txn)
        .await?;
    }
    for &(id, city_id, name) in DISTRICTS {
        district::ActiveModel {
            id: Set(id),
            city_id: Set(city_id),
            name: Set(name.to_owned()),
        }
        .insert(&txn)
        .await?;
    }
    for &(id, district_id, name, postal_code) in SUBDISTRICTS {
        subdistrict::ActiveModel {
            id: Set(id),
            district_id: Set(district_id),
            name: Set(name.to_owned()),
            postal_code: Set(postal_code.to_owned()),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    tracing::info!(
        "Seeded {} provinces, {} cities, {} districts, {} subdistricts",
        PROVINCES.len(),
        CITIES.len(),
        DISTRICTS.len(),
        SUBDISTRICTS.len()
    );
    Ok(())
}

fn sku(code: &str, price: f64, stock: i32, variants: &[&str]) -> NewSku {
    NewSku {
        code: code.to_owned(),
        price,
        stock,
        image_url: None,
        variants: variants.iter().map(|v| v.to_string()).collect(),
    }
}

/// Demo marketplace. Skipped when the admin account already exists.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    seed_locations(state.db()).await?;

    if state.user_repo.username_exists("admin").await? {
        tracing::info!("Demo data already present, skipping");
        return Ok(());
    }

    let admin_password = hash_password("admin12345").map_err(DomainError::Internal)?;
    state
        .user_repo
        .create(NewUser {
            email: "admin@kedai.local".to_owned(),
            username: "admin".to_owned(),
            password_hash: admin_password,
            full_name: "Kedai Admin".to_owned(),
            phone: None,
            role: ROLE_ADMIN.to_owned(),
        })
        .await?;

    let seller = user_service::register(
        state,
        RegisterInput {
            email: "toko@kedai.local".to_owned(),
            username: "tokobatik".to_owned(),
            password: "seller12345".to_owned(),
            full_name: "Sari Wulandari".to_owned(),
            phone: Some("081234567890".to_owned()),
        },
    )
    .await?
    .user;

    address_service::create_address(
        state,
        seller.id,
        AddressInput {
            label: "Gudang".to_owned(),
            recipient_name: "Sari Wulandari".to_owned(),
            phone: "081234567890".to_owned(),
            province_id: 34,
            city_id: 3471,
            district_id: 347101,
            subdistrict_id: 3471011,
            postal_code: None,
            detail: "Jl. Terban No. 12".to_owned(),
            is_default: true,
            is_pickup: true,
        },
    )
    .await?;

    shop_service::create_shop(
        state,
        seller.id,
        ShopInput {
            name: "Toko Batik Sari".to_owned(),
            description: Some("Batik tulis dan cap dari Yogyakarta".to_owned()),
        },
    )
    .await?;

    let fashion = category_service::create_category(
        state,
        CategoryInput {
            parent_id: None,
            name: "Fashion".to_owned(),
            icon_url: None,
        },
    )
    .await?;
    let batik = category_service::create_category(
        state,
        CategoryInput {
            parent_id: Some(fashion.id),
            name: "Kemeja Batik".to_owned(),
            icon_url: None,
        },
    )
    .await?;
    let fabric = category_service::create_category(
        state,
        CategoryInput {
            parent_id: Some(fashion.id),
            name: "Kain".to_owned(),
            icon_url: None,
        },
    )
    .await?;

    product_service::create_product(
        state,
        seller.id,
        ProductInput {
            category_id: batik.id,
            name: "Kemeja Batik Parang".to_owned(),
            description: Some("Katun primisima, lengan panjang".to_owned()),
            status: None,
            variant_groups: vec![
                NewVariantGroup {
                    name: "Warna".to_owned(),
                    variants: vec!["Coklat".to_owned(), "Biru".to_owned()],
                },
                NewVariantGroup {
                    name: "Ukuran".to_owned(),
                    variants: vec!["M".to_owned(), "L".to_owned()],
                },
            ],
            skus: vec![
                sku("PRG-CKL-M", 185_000.0, 10, &["Coklat", "M"]),
                sku("PRG-CKL-L", 195_000.0, 8, &["Coklat", "L"]),
                sku("PRG-BRU-M", 185_000.0, 5, &["Biru", "M"]),
            ],
        },
    )
    .await?;

    product_service::create_product(
        state,
        seller.id,
        ProductInput {
            category_id: fabric.id,
            name: "Kain Batik Tulis Sogan".to_owned(),
            description: None,
            status: None,
            variant_groups: vec![],
            skus: vec![sku("SGN-01", 450_000.0, 3, &[])],
        },
    )
    .await?;

    let today = chrono::Local::now().date_naive();
    let end = today + chrono::Duration::days(30);
    marketplace_service::create_voucher(
        state,
        VoucherInput {
            code: "KEDAIBARU".to_owned(),
            name: "Diskon pengguna baru".to_owned(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            min_purchase: 100_000.0,
            max_discount: Some(25_000.0),
            quota: 100,
            start_date: today.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        },
    )
    .await?;

    marketplace_service::create_banner(
        state,
        BannerInput {
            title: "Pekan Batik Nusantara".to_owned(),
            image_url: "/static/banners/batik.png".to_owned(),
            link_url: Some("/categories/1".to_owned()),
            sort_order: 0,
            is_active: true,
        },
    )
    .await?;

    tracing::info!("Demo marketplace seeded");
    Ok(())
}
