pub mod address;
pub mod auth;
pub mod category;
pub mod discussion;
pub mod error;
pub mod health;
pub mod location;
pub mod marketplace;
pub mod product;
pub mod shop;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Locations
        .route("/locations/provinces", get(location::list_provinces))
        .route("/locations/provinces/:id/cities", get(location::list_cities))
        .route("/locations/cities/:id/districts", get(location::list_districts))
        .route(
            "/locations/districts/:id/subdistricts",
            get(location::list_subdistricts),
        )
        .route("/locations/subdistricts/:id", get(location::get_subdistrict))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me).put(auth::update_me))
        // Addresses
        .route(
            "/users/me/addresses",
            get(address::list_addresses).post(address::create_address),
        )
        .route(
            "/users/me/addresses/:id",
            get(address::get_address)
                .put(address::update_address)
                .delete(address::delete_address),
        )
        .route("/users/me/addresses/:id/default", put(address::set_default))
        .route("/users/me/addresses/:id/pickup", put(address::set_pickup))
        // Shops
        .route("/shops", post(shop::create_shop))
        .route("/shops/me", get(shop::get_my_shop))
        .route("/shops/:slug", get(shop::get_shop))
        .route("/shops/:slug/products", get(shop::list_shop_products))
        // Categories
        .route(
            "/categories",
            get(category::list_tree).post(category::create_category),
        )
        .route(
            "/categories/:id",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route("/categories/:id/lineage", get(category::get_lineage))
        // Products
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route("/products/slug/:slug", get(product::get_product_by_slug))
        .route("/skus/:id", put(product::update_sku))
        // Discussions
        .route(
            "/products/:id/discussions",
            get(discussion::list_discussions).post(discussion::create_discussion),
        )
        .route(
            "/discussions/:id",
            axum::routing::delete(discussion::delete_discussion),
        )
        .route("/discussions/:id/replies", post(discussion::create_reply))
        .route("/replies/:id", axum::routing::delete(discussion::delete_reply))
        // Marketplace: vouchers are read by code and written by id
        .route(
            "/marketplace/vouchers",
            get(marketplace::list_active_vouchers).post(marketplace::create_voucher),
        )
        .route(
            "/marketplace/vouchers/:key",
            get(marketplace::get_voucher)
                .put(marketplace::update_voucher)
                .delete(marketplace::delete_voucher),
        )
        .route(
            "/marketplace/vouchers/:key/apply",
            post(marketplace::apply_voucher),
        )
        .route(
            "/marketplace/banners",
            get(marketplace::list_active_banners).post(marketplace::create_banner),
        )
        .route("/marketplace/banners/all", get(marketplace::list_all_banners))
        .route(
            "/marketplace/banners/:id",
            put(marketplace::update_banner).delete(marketplace::delete_banner),
        )
        .with_state(state)
}
