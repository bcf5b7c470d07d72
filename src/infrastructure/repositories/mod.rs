//! Repository implementations using SeaORM

pub mod address_repository;
pub mod category_repository;
pub mod discussion_repository;
pub mod location_repository;
pub mod marketplace_repository;
pub mod product_repository;
pub mod shop_repository;
pub mod user_repository;

pub use address_repository::SeaOrmAddressRepository;
pub use category_repository::SeaOrmCategoryRepository;
pub use discussion_repository::SeaOrmDiscussionRepository;
pub use location_repository::SeaOrmLocationRepository;
pub use marketplace_repository::SeaOrmMarketplaceRepository;
pub use product_repository::SeaOrmProductRepository;
pub use shop_repository::SeaOrmShopRepository;
pub use user_repository::SeaOrmUserRepository;
