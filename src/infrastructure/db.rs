use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    if database_url.contains(":memory:") {
        // Every pooled connection would open its own empty in-memory database
        options
            .max_connections(1)
            .min_connections(1)
            .max_lifetime(Duration::from_secs(24 * 60 * 60));
    }
    let db = Database::connect(options).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn exec(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    exec(db, "PRAGMA foreign_keys = ON").await?;

    // Location reference data
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS provinces (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS cities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            province_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            city_type TEXT NOT NULL DEFAULT 'kota',
            FOREIGN KEY (province_id) REFERENCES provinces(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS districts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            FOREIGN KEY (city_id) REFERENCES cities(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS subdistricts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            district_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            postal_code TEXT NOT NULL,
            FOREIGN KEY (district_id) REFERENCES districts(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_cities_province ON cities(province_id)",
    )
    .await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_districts_city ON districts(city_id)",
    )
    .await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_subdistricts_district ON subdistricts(district_id)",
    )
    .await?;

    // Users and addresses
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT NOT NULL,
            phone TEXT,
            role TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS user_addresses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            label TEXT NOT NULL,
            recipient_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            province_id INTEGER NOT NULL,
            city_id INTEGER NOT NULL,
            district_id INTEGER NOT NULL,
            subdistrict_id INTEGER NOT NULL,
            postal_code TEXT NOT NULL,
            detail TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            is_pickup INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (province_id) REFERENCES provinces(id),
            FOREIGN KEY (city_id) REFERENCES cities(id),
            FOREIGN KEY (district_id) REFERENCES districts(id),
            FOREIGN KEY (subdistrict_id) REFERENCES subdistricts(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_user_addresses_user ON user_addresses(user_id)",
    )
    .await?;

    // Shops
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS shops (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .await?;

    // Catalog
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_id INTEGER,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            icon_url TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (parent_id) REFERENCES categories(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (shop_id) REFERENCES shops(id),
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)",
    )
    .await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_products_shop ON products(shop_id)",
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS skus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            code TEXT NOT NULL,
            price REAL NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0,
            image_url TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_skus_product ON skus(product_id)",
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS variant_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS variants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            variant_group_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (variant_group_id) REFERENCES variant_groups(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS sku_variants (
            sku_id INTEGER NOT NULL,
            variant_id INTEGER NOT NULL,
            PRIMARY KEY (sku_id, variant_id),
            FOREIGN KEY (sku_id) REFERENCES skus(id) ON DELETE CASCADE,
            FOREIGN KEY (variant_id) REFERENCES variants(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    // Discussions
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS discussions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (product_id) REFERENCES products(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS discussion_replies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            discussion_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            is_seller INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT,
            FOREIGN KEY (discussion_id) REFERENCES discussions(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .await?;

    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_discussions_product ON discussions(product_id)",
    )
    .await?;

    // Marketplace
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS marketplace_vouchers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            discount_type TEXT NOT NULL,
            discount_value REAL NOT NULL,
            min_purchase REAL NOT NULL DEFAULT 0,
            max_discount REAL,
            quota INTEGER NOT NULL,
            used INTEGER NOT NULL DEFAULT 0,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS marketplace_banners (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            image_url TEXT NOT NULL,
            link_url TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    )
    .await?;

    tracing::debug!("Database migrations applied");
    Ok(())
}
