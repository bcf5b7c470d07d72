mod common;

use axum::http::StatusCode;
use kedai::auth::{self, ROLE_USER};
use kedai::config::{Config, DEV_JWT_SECRET};
use kedai::db;
use kedai::infrastructure::AppState;
use serde_json::{Value, json};

use common::{app, register_user, send, setup_test_state};

#[tokio::test]
async fn test_register_login_and_me() {
    let state = setup_test_state().await;
    let router = app(&state);

    let (status, body) = send(
        &router,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": "Sari@Kedai.Test",
            "username": "sari.w",
            "password": "rahasia123",
            "full_name": "Sari Wulandari",
            "phone": "081234567890",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["user"]["email"], "sari@kedai.test");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some());

    for identifier in ["sari.w", "sari@kedai.test"] {
        let (status, body) = send(
            &router,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "identifier": identifier, "password": "rahasia123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login as {}", identifier);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, me) = send(&router, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "sari.w");
        assert_eq!(me["phone"], "081234567890");
    }
}

#[tokio::test]
async fn test_duplicates_conflict() {
    let state = setup_test_state().await;
    let router = app(&state);
    register_user(&router, "budi").await;

    let same_username = json!({
        "email": "lain@kedai.test",
        "username": "budi",
        "password": "password123",
        "full_name": "Budi Lain",
    });
    let same_email = json!({
        "email": "BUDI@kedai.test",
        "username": "budi2",
        "password": "password123",
        "full_name": "Budi Lain",
    });
    for payload in [same_username, same_email] {
        let (status, body) = send(&router, "POST", "/auth/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }
}

#[tokio::test]
async fn test_rejects_bad_credentials_and_input() {
    let state = setup_test_state().await;
    let router = app(&state);
    register_user(&router, "budi").await;

    let (status, body) = send(
        &router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "identifier": "budi", "password": "salah12345" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(
        &router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "identifier": "tidakada", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, "GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&router, "GET", "/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let invalid = [
        json!({ "email": "bukan-email", "username": "andi", "password": "password123", "full_name": "Andi" }),
        json!({ "email": "andi@kedai.test", "username": "a!", "password": "password123", "full_name": "Andi" }),
        json!({ "email": "andi@kedai.test", "username": "andi", "password": "pendek", "full_name": "Andi" }),
        json!({ "email": "andi@kedai.test", "username": "andi", "password": "password123", "full_name": "Andi 😀" }),
    ];
    for payload in invalid {
        let (status, body) = send(&router, "POST", "/auth/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(body["error"], "validation_error");
    }
}

#[tokio::test]
async fn test_profile_update() {
    let state = setup_test_state().await;
    let router = app(&state);
    let (_, token) = register_user(&router, "budi").await;

    let (status, me) = send(
        &router,
        "PUT",
        "/auth/me",
        Some(&token),
        Some(json!({ "full_name": "Budi Santoso", "phone": "+6281234567890" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", me);
    assert_eq!(me["full_name"], "Budi Santoso");
    assert_eq!(me["phone"], "+6281234567890");

    // an empty phone clears it
    let (_, me) = send(
        &router,
        "PUT",
        "/auth/me",
        Some(&token),
        Some(json!({ "phone": "" })),
    )
    .await;
    assert_eq!(me["phone"], Value::Null);
    assert_eq!(me["full_name"], "Budi Santoso");

    let (status, _) = send(
        &router,
        "PUT",
        "/auth/me",
        Some(&token),
        Some(json!({ "phone": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tokens_are_signed_with_the_configured_secret() {
    let db = db::init_db("sqlite::memory:").await.unwrap();
    let config = Config::from_lookup(|key| {
        (key == "JWT_SECRET").then(|| "kunci-produksi".to_string())
    });
    let state = AppState::from_config(db, &config);
    assert_eq!(&*state.jwt_secret, "kunci-produksi");
    let router = app(&state);

    let (user_id, token) = register_user(&router, "budi").await;
    let (status, _) = send(&router, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(auth::decode_jwt("kunci-produksi", &token).is_ok());

    let forged = auth::create_jwt(DEV_JWT_SECRET, user_id, "budi", ROLE_USER).unwrap();
    let (status, body) = send(&router, "GET", "/auth/me", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}
