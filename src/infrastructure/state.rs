//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    AddressRepository, CategoryRepository, DiscussionRepository, LocationRepository,
    MarketplaceRepository, ProductRepository, ShopRepository, UserRepository,
};
use crate::infrastructure::cache::{Cache, InMemoryCache};
use crate::infrastructure::config::Config;
use crate::infrastructure::{
    SeaOrmAddressRepository, SeaOrmCategoryRepository, SeaOrmDiscussionRepository,
    SeaOrmLocationRepository, SeaOrmMarketplaceRepository, SeaOrmProductRepository,
    SeaOrmShopRepository, SeaOrmUserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub cache: Arc<dyn Cache>,
    /// Lifetime of entries written to `cache`
    pub cache_ttl: Duration,
    /// HMAC key for issuing and checking access tokens
    pub jwt_secret: Arc<str>,
    pub location_repo: Arc<dyn LocationRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub address_repo: Arc<dyn AddressRepository>,
    pub shop_repo: Arc<dyn ShopRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub discussion_repo: Arc<dyn DiscussionRepository>,
    pub marketplace_repo: Arc<dyn MarketplaceRepository>,
}

impl AppState {
    /// Create a new AppState with default settings and an in-memory cache
    pub fn new(db: DatabaseConnection) -> Self {
        Self::from_config(db, &Config::from_lookup(|_| None))
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::with_cache(
            db,
            Arc::new(InMemoryCache::new()),
            config.cache_ttl,
            &config.jwt_secret,
        )
    }

    pub fn with_cache(
        db: DatabaseConnection,
        cache: Arc<dyn Cache>,
        cache_ttl: Duration,
        jwt_secret: &str,
    ) -> Self {
        Self {
            location_repo: Arc::new(SeaOrmLocationRepository::new(db.clone())),
            user_repo: Arc::new(SeaOrmUserRepository::new(db.clone())),
            address_repo: Arc::new(SeaOrmAddressRepository::new(db.clone())),
            shop_repo: Arc::new(SeaOrmShopRepository::new(db.clone())),
            category_repo: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            product_repo: Arc::new(SeaOrmProductRepository::new(db.clone())),
            discussion_repo: Arc::new(SeaOrmDiscussionRepository::new(db.clone())),
            marketplace_repo: Arc::new(SeaOrmMarketplaceRepository::new(db.clone())),
            db,
            cache,
            cache_ttl,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
