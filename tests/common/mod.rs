#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use kedai::api;
use kedai::auth::{self, ROLE_ADMIN};
use kedai::db;
use kedai::domain::NewUser;
use kedai::infrastructure::AppState;
use kedai::seed;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

/// Fresh in-memory database with the location reference set loaded
pub async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    seed::seed_locations(&db)
        .await
        .expect("Failed to seed locations");
    AppState::new(db)
}

pub fn app(state: &AppState) -> Router {
    api::api_router(state.clone())
}

/// Send a JSON request and decode the JSON response (Null when empty)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Admin account created straight through the repository; returns a token
pub async fn create_test_admin(state: &AppState) -> String {
    let admin = state
        .user_repo
        .create(NewUser {
            email: "admin@kedai.test".to_string(),
            username: "admin".to_string(),
            password_hash: "unused".to_string(),
            full_name: "Admin".to_string(),
            phone: None,
            role: ROLE_ADMIN.to_string(),
        })
        .await
        .expect("Failed to create admin");
    auth::create_jwt(&state.jwt_secret, admin.id, &admin.username, &admin.role)
        .expect("Failed to create token")
}

/// Register through the API; returns (user id, token)
pub async fn register_user(app: &Router, username: &str) -> (i32, String) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": format!("{}@kedai.test", username),
            "username": username,
            "password": "password123",
            "full_name": "Test User",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    (
        body["user"]["id"].as_i64().unwrap() as i32,
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Address in Senayan, Kebayoran Baru, Jakarta Selatan
pub fn senayan_address(label: &str) -> Value {
    json!({
        "label": label,
        "recipient_name": "Budi Santoso",
        "phone": "081234567890",
        "province_id": 31,
        "city_id": 3171,
        "district_id": 317101,
        "subdistrict_id": 3171011,
        "detail": "Jl. Asia Afrika No. 8",
    })
}

/// Register a seller with a pickup address and an open shop; returns the token
pub async fn create_seller(app: &Router, username: &str, shop_name: &str) -> String {
    let (_, token) = register_user(app, username).await;
    let (status, _) = send(
        app,
        "POST",
        "/users/me/addresses",
        Some(&token),
        Some(senayan_address("Gudang")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/shops",
        Some(&token),
        Some(json!({ "name": shop_name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "shop failed: {}", body);
    token
}
