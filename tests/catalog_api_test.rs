mod common;

use axum::Router;
use axum::http::StatusCode;
use kedai::infrastructure::cache::{Cache, keys};
use serde_json::{Value, json};

use common::{app, create_seller, create_test_admin, register_user, send, setup_test_state};

async fn create_category(router: &Router, admin: &str, name: &str, parent_id: Option<i64>) -> i64 {
    let (status, body) = send(
        router,
        "POST",
        "/categories",
        Some(admin),
        Some(json!({ "name": name, "parent_id": parent_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "category failed: {}", body);
    body["id"].as_i64().unwrap()
}

fn shirt(category_id: i64, name: &str, prices: [f64; 2]) -> Value {
    json!({
        "category_id": category_id,
        "name": name,
        "description": "Kemeja lengan panjang",
        "variant_groups": [
            { "name": "Ukuran", "variants": ["M", "L"] }
        ],
        "skus": [
            { "code": format!("{}-M", name), "price": prices[0], "stock": 5, "variants": ["M"] },
            { "code": format!("{}-L", name), "price": prices[1], "stock": 3, "variants": ["L"] }
        ]
    })
}

fn single(category_id: i64, name: &str, price: f64) -> Value {
    json!({
        "category_id": category_id,
        "name": name,
        "skus": [{ "code": name, "price": price, "stock": 1 }]
    })
}

/// Fashion > (Kemeja, Kain) plus an unrelated Elektronik root
struct Catalog {
    fashion: i64,
    kemeja: i64,
    kain: i64,
    elektronik: i64,
}

async fn catalog(router: &Router, admin: &str) -> Catalog {
    let fashion = create_category(router, admin, "Fashion", None).await;
    let kemeja = create_category(router, admin, "Kemeja", Some(fashion)).await;
    let kain = create_category(router, admin, "Kain", Some(fashion)).await;
    let elektronik = create_category(router, admin, "Elektronik", None).await;
    Catalog {
        fashion,
        kemeja,
        kain,
        elektronik,
    }
}

fn names(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_only_admins_manage_categories() {
    let state = setup_test_state().await;
    let router = app(&state);
    let (_, buyer) = register_user(&router, "pembeli").await;

    let (status, body) = send(
        &router,
        "POST",
        "/categories",
        Some(&buyer),
        Some(json!({ "name": "Fashion" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = send(
        &router,
        "POST",
        "/categories",
        None,
        Some(json!({ "name": "Fashion" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = create_test_admin(&state).await;
    let first = create_category(&router, &admin, "Fashion", None).await;
    let (status, body) = send(
        &router,
        "POST",
        "/categories",
        Some(&admin),
        Some(json!({ "name": "Fashion" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "fashion-2");
    assert_ne!(body["id"].as_i64().unwrap(), first);

    let (status, _) = send(
        &router,
        "POST",
        "/categories",
        Some(&admin),
        Some(json!({ "name": "Orphan", "parent_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shop_requires_pickup_address() {
    let state = setup_test_state().await;
    let router = app(&state);
    let (_, token) = register_user(&router, "tanpaalamat").await;

    let (status, body) = send(
        &router,
        "POST",
        "/shops",
        Some(&token),
        Some(json!({ "name": "Toko Kosong" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&router, "GET", "/shops/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;
    let (status, body) = send(&router, "GET", "/shops/me", Some(&seller), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "toko-batik-sari");

    let (status, _) = send(
        &router,
        "POST",
        "/shops",
        Some(&seller),
        Some(json!({ "name": "Toko Kedua" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&router, "GET", "/shops/toko-batik-sari", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Toko Batik Sari");
}

#[tokio::test]
async fn test_product_lifecycle_and_detail() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let cats = catalog(&router, &admin).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    // Fashion has children, so it cannot hold products
    let (status, body) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(shirt(cats.fashion, "Kemeja Parang", [150_000.0, 160_000.0])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("leaf"));

    // buyers without a shop cannot list products
    let (_, buyer) = register_user(&router, "pembeli").await;
    let (status, _) = send(
        &router,
        "POST",
        "/products",
        Some(&buyer),
        Some(shirt(cats.kemeja, "Kemeja Parang", [150_000.0, 160_000.0])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(shirt(cats.kemeja, "Kemeja Parang", [150_000.0, 160_000.0])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", created);
    assert_eq!(created["slug"], "kemeja-parang");
    assert_eq!(created["status"], "active");
    assert_eq!(created["min_price"], json!(150_000.0));
    assert_eq!(created["max_price"], json!(160_000.0));
    assert_eq!(created["total_stock"], json!(8));
    assert_eq!(created["shop"]["name"], "Toko Batik Sari");
    let lineage: Vec<&str> = created["lineage"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(lineage, vec!["Fashion", "Kemeja"]);
    assert_eq!(created["variant_groups"][0]["variants"][1]["name"], "L");
    assert_eq!(created["skus"][1]["variants"], json!(["L"]));
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&router, "GET", "/products/slug/kemeja-parang", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64().unwrap(), id);

    // a second product with the same name gets a suffixed slug
    let (_, twin) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(single(cats.kemeja, "Kemeja Parang", 99_000.0)),
    )
    .await;
    assert_eq!(twin["slug"], "kemeja-parang-2");

    // renaming keeps the slug
    let uri = format!("/products/{}", id);
    let (status, body) = send(
        &router,
        "PUT",
        &uri,
        Some(&seller),
        Some(json!({ "name": "Kemeja Parang Rusak", "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "kemeja-parang");
    assert_eq!(body["description"], Value::Null);

    let (status, _) = send(
        &router,
        "PUT",
        &uri,
        Some(&buyer),
        Some(json!({ "name": "Dibajak" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&router, "DELETE", &uri, Some(&buyer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // drafts disappear from the public detail
    let (status, _) = send(
        &router,
        "PUT",
        &uri,
        Some(&seller),
        Some(json!({ "status": "draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "DELETE", &uri, Some(&seller), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "DELETE", &uri, Some(&seller), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = cats.kain;
    let _ = cats.elektronik;
}

#[tokio::test]
async fn test_variant_matrix_is_enforced() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let kemeja = create_category(&router, &admin, "Kemeja", None).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    let duplicate_combination = json!({
        "category_id": kemeja,
        "name": "Kemeja Kawung",
        "variant_groups": [{ "name": "Ukuran", "variants": ["M", "L"] }],
        "skus": [
            { "code": "A", "price": 10_000.0, "stock": 1, "variants": ["M"] },
            { "code": "B", "price": 10_000.0, "stock": 1, "variants": ["m"] }
        ]
    });
    let missing_group = json!({
        "category_id": kemeja,
        "name": "Kemeja Kawung",
        "variant_groups": [
            { "name": "Ukuran", "variants": ["M", "L"] },
            { "name": "Warna", "variants": ["Biru"] }
        ],
        "skus": [{ "code": "A", "price": 10_000.0, "stock": 1, "variants": ["M"] }]
    });
    let two_plain_skus = json!({
        "category_id": kemeja,
        "name": "Kemeja Kawung",
        "skus": [
            { "code": "A", "price": 10_000.0, "stock": 1 },
            { "code": "B", "price": 12_000.0, "stock": 1 }
        ]
    });
    let zero_price = single(kemeja, "Kemeja Kawung", 0.0);

    for payload in [duplicate_combination, missing_group, two_plain_skus, zero_price] {
        let (status, body) = send(&router, "POST", "/products", Some(&seller), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn test_listing_filters_and_sorts() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let cats = catalog(&router, &admin).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    for payload in [
        shirt(cats.kemeja, "Kemeja Parang", [150_000.0, 160_000.0]),
        single(cats.kain, "Kain Sogan", 450_000.0),
        single(cats.elektronik, "Radio Transistor", 75_000.0),
    ] {
        let (status, body) = send(&router, "POST", "/products", Some(&seller), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, page) = send(&router, "GET", "/products?sort=price_asc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], json!(3));
    assert_eq!(
        names(&page),
        vec!["Radio Transistor", "Kemeja Parang", "Kain Sogan"]
    );
    assert_eq!(page["items"][1]["min_price"], json!(150_000.0));
    assert_eq!(page["items"][1]["max_price"], json!(160_000.0));
    assert_eq!(page["items"][1]["shop_name"], "Toko Batik Sari");
    assert_eq!(page["items"][1]["category_name"], "Kemeja");

    let (_, page) = send(&router, "GET", "/products?sort=price_desc", None, None).await;
    assert_eq!(names(&page)[0], "Kain Sogan");

    let (_, page) = send(&router, "GET", "/products?sort=name", None, None).await;
    assert_eq!(
        names(&page),
        vec!["Kain Sogan", "Kemeja Parang", "Radio Transistor"]
    );

    // a parent category includes its descendants
    let uri = format!("/products?category_id={}&sort=name", cats.fashion);
    let (_, page) = send(&router, "GET", &uri, None, None).await;
    assert_eq!(names(&page), vec!["Kain Sogan", "Kemeja Parang"]);

    let uri = format!("/products?category_id={}", cats.kemeja);
    let (_, page) = send(&router, "GET", &uri, None, None).await;
    assert_eq!(names(&page), vec!["Kemeja Parang"]);

    let (_, page) = send(
        &router,
        "GET",
        "/products?min_price=100000&max_price=200000",
        None,
        None,
    )
    .await;
    assert_eq!(names(&page), vec!["Kemeja Parang"]);

    let (_, page) = send(&router, "GET", "/products?q=kain", None, None).await;
    assert_eq!(names(&page), vec!["Kain Sogan"]);

    let (_, page) = send(&router, "GET", "/products?limit=2&page=2&sort=name", None, None).await;
    assert_eq!(page["total_pages"], json!(2));
    assert_eq!(names(&page), vec!["Radio Transistor"]);

    let (status, _) = send(
        &router,
        "GET",
        "/products?min_price=500&max_price=100",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, "GET", "/products?category_id=999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, page) = send(&router, "GET", "/shops/toko-batik-sari/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], json!(3));
}

#[tokio::test]
async fn test_category_tree_rolls_up_min_price() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let cats = catalog(&router, &admin).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    let (_, product) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(shirt(cats.kemeja, "Kemeja Parang", [150_000.0, 160_000.0])),
    )
    .await;
    send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(single(cats.kain, "Kain Sogan", 450_000.0)),
    )
    .await;

    let (status, tree) = send(&router, "GET", "/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let roots: Vec<&str> = tree
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(roots, vec!["Elektronik", "Fashion"]);
    assert_eq!(tree[0]["min_price"], Value::Null);
    assert_eq!(tree[1]["min_price"], json!(150_000.0));
    assert_eq!(tree[1]["children"][0]["name"], "Kain");
    assert_eq!(tree[1]["children"][0]["min_price"], json!(450_000.0));
    assert!(state.cache.get(keys::CATEGORY_TREE).await.is_some());

    // a cheaper sku price invalidates the cached tree
    let sku_id = product["skus"][0]["id"].as_i64().unwrap();
    let (status, sku) = send(
        &router,
        "PUT",
        &format!("/skus/{}", sku_id),
        Some(&seller),
        Some(json!({ "price": 99_000.0, "stock": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sku["stock"], json!(7));
    assert!(state.cache.get(keys::CATEGORY_TREE).await.is_none());

    let (_, node) = send(&router, "GET", &format!("/categories/{}", cats.fashion), None, None).await;
    assert_eq!(node["min_price"], json!(99_000.0));
    assert_eq!(node["children"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &router,
        "PUT",
        &format!("/skus/{}", sku_id),
        Some(&seller),
        Some(json!({ "stock": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, buyer) = register_user(&router, "pembeli").await;
    let (status, _) = send(
        &router,
        "PUT",
        &format!("/skus/{}", sku_id),
        Some(&buyer),
        Some(json!({ "price": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_category_lineage_moves_and_delete_guards() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let cats = catalog(&router, &admin).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    let (status, lineage) = send(
        &router,
        "GET",
        &format!("/categories/{}/lineage", cats.kemeja),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lineage[0]["id"].as_i64().unwrap(), cats.fashion);
    assert_eq!(lineage[1]["id"].as_i64().unwrap(), cats.kemeja);

    // moving Fashion under its own child would close a loop
    let (status, _) = send(
        &router,
        "PUT",
        &format!("/categories/{}", cats.fashion),
        Some(&admin),
        Some(json!({ "parent_id": cats.kemeja })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, moved) = send(
        &router,
        "PUT",
        &format!("/categories/{}", cats.kain),
        Some(&admin),
        Some(json!({ "parent_id": null, "name": "Kain Tradisional" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["parent_id"], Value::Null);
    assert_eq!(moved["slug"], "kain-tradisional");

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/categories/{}", cats.fashion),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(single(cats.kemeja, "Kemeja Polos", 50_000.0)),
    )
    .await;
    let (status, body) = send(
        &router,
        "DELETE",
        &format!("/categories/{}", cats.kemeja),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("products"));

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/categories/{}", cats.elektronik),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &router,
        "GET",
        &format!("/categories/{}", cats.elektronik),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_discussions_mark_seller_replies() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let kemeja = create_category(&router, &admin, "Kemeja", None).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;
    let (_, buyer) = register_user(&router, "pembeli").await;
    let (_, other) = register_user(&router, "lainnya").await;

    let (_, product) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(single(kemeja, "Kemeja Polos", 50_000.0)),
    )
    .await;
    let product_id = product["id"].as_i64().unwrap();
    let thread_uri = format!("/products/{}/discussions", product_id);

    let (status, _) = send(
        &router,
        "POST",
        &thread_uri,
        None,
        Some(json!({ "content": "Ready?" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, discussion) = send(
        &router,
        "POST",
        &thread_uri,
        Some(&buyer),
        Some(json!({ "content": "Ukuran L masih ada?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(discussion["username"], "pembeli");
    let discussion_id = discussion["id"].as_i64().unwrap();
    let replies_uri = format!("/discussions/{}/replies", discussion_id);

    let (status, seller_reply) = send(
        &router,
        "POST",
        &replies_uri,
        Some(&seller),
        Some(json!({ "content": "Masih, silakan diorder" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(seller_reply["is_seller"], json!(true));

    let (_, buyer_reply) = send(
        &router,
        "POST",
        &replies_uri,
        Some(&buyer),
        Some(json!({ "content": "Terima kasih" })),
    )
    .await;
    assert_eq!(buyer_reply["is_seller"], json!(false));

    let (status, _) = send(
        &router,
        "POST",
        &replies_uri,
        Some(&buyer),
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = send(&router, "GET", &thread_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], json!(1));
    let replies = page["items"][0]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["content"], "Masih, silakan diorder");

    let reply_uri = format!("/replies/{}", buyer_reply["id"].as_i64().unwrap());
    let (status, _) = send(&router, "DELETE", &reply_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&router, "DELETE", &reply_uri, Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&router, "GET", &thread_uri, None, None).await;
    assert_eq!(page["items"][0]["replies"].as_array().unwrap().len(), 1);

    let discussion_uri = format!("/discussions/{}", discussion_id);
    let (status, _) = send(&router, "DELETE", &discussion_uri, Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&router, "DELETE", &discussion_uri, Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, page) = send(&router, "GET", &thread_uri, None, None).await;
    assert_eq!(page["total"], json!(0));

    let (status, _) = send(&router, "GET", "/products/999/discussions", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_range_page_is_empty() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let kemeja = create_category(&router, &admin, "Kemeja", None).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;
    let (_, product) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(single(kemeja, "Kemeja Polos", 50_000.0)),
    )
    .await;
    let product_id = product["id"].as_i64().unwrap();

    for uri in [
        "/products?page=18446744073709551615".to_string(),
        "/products?page=18446744073709551615&limit=100".to_string(),
        "/shops/toko-batik-sari/products?page=18446744073709551615".to_string(),
        format!("/products/{}/discussions?page=18446744073709551615", product_id),
    ] {
        let (status, page) = send(&router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(page["items"], json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn test_draft_products_have_no_public_discussions() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let kemeja = create_category(&router, &admin, "Kemeja", None).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;
    let (_, buyer) = register_user(&router, "pembeli").await;

    let (_, product) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(single(kemeja, "Kemeja Polos", 50_000.0)),
    )
    .await;
    let product_uri = format!("/products/{}", product["id"].as_i64().unwrap());
    let thread_uri = format!("{}/discussions", product_uri);

    let (status, discussion) = send(
        &router,
        "POST",
        &thread_uri,
        Some(&buyer),
        Some(json!({ "content": "Bahannya katun?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let replies_uri = format!("/discussions/{}/replies", discussion["id"].as_i64().unwrap());

    let (status, _) = send(
        &router,
        "PUT",
        &product_uri,
        Some(&seller),
        Some(json!({ "status": "draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "GET", &thread_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &router,
        "POST",
        &thread_uri,
        Some(&buyer),
        Some(json!({ "content": "Masih dijual?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &router,
        "POST",
        &replies_uri,
        Some(&seller),
        Some(json!({ "content": "Iya katun" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // publishing brings the thread back untouched
    send(
        &router,
        "PUT",
        &product_uri,
        Some(&seller),
        Some(json!({ "status": "active" })),
    )
    .await;
    let (status, page) = send(&router, "GET", &thread_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], json!(1));
    assert_eq!(page["items"][0]["replies"], json!([]));
}

#[tokio::test]
async fn test_deleting_a_product_retires_its_skus() {
    use kedai::models::sku;
    use sea_orm::EntityTrait;

    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let kemeja = create_category(&router, &admin, "Kemeja", None).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    let (_, product) = send(
        &router,
        "POST",
        "/products",
        Some(&seller),
        Some(shirt(kemeja, "Kemeja Parang", [150_000.0, 160_000.0])),
    )
    .await;
    let sku_id = product["skus"][0]["id"].as_i64().unwrap();

    let uri = format!("/products/{}", product["id"].as_i64().unwrap());
    let (status, _) = send(&router, "DELETE", &uri, Some(&seller), None).await;
    assert_eq!(status, StatusCode::OK);

    let rows = sku::Entity::find().all(state.db()).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.deleted_at.is_some()));

    let (status, _) = send(
        &router,
        "PUT",
        &format!("/skus/{}", sku_id),
        Some(&seller),
        Some(json!({ "stock": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, node) = send(&router, "GET", &format!("/categories/{}", kemeja), None, None).await;
    assert_eq!(node["min_price"], Value::Null);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let state = setup_test_state().await;
    let router = app(&state);
    let admin = create_test_admin(&state).await;
    let kain = create_category(&router, &admin, "Kain", None).await;
    let seller = create_seller(&router, "penjual", "Toko Batik Sari").await;

    for payload in [
        single(kain, "Kain Katun 100%", 80_000.0),
        single(kain, "Kain_Sutra", 300_000.0),
        single(kain, "Kain Sogan", 450_000.0),
    ] {
        let (status, body) = send(&router, "POST", "/products", Some(&seller), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, page) = send(&router, "GET", "/products?q=%25", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&page), vec!["Kain Katun 100%"]);

    let (_, page) = send(&router, "GET", "/products?q=_", None, None).await;
    assert_eq!(names(&page), vec!["Kain_Sutra"]);

    let (_, page) = send(&router, "GET", "/products?q=kain&sort=name", None, None).await;
    assert_eq!(page["total"], json!(3));
}
