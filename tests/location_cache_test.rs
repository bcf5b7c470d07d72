mod common;

use std::time::Duration;

use axum::http::StatusCode;
use kedai::infrastructure::cache::{Cache, keys};
use serde_json::json;

use common::{app, send, setup_test_state};

#[tokio::test]
async fn test_provinces_are_sorted_and_cached() {
    let state = setup_test_state().await;
    let router = app(&state);

    assert!(state.cache.get(keys::PROVINCES).await.is_none());

    let (status, body) = send(&router, "GET", "/locations/provinces", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["DI Yogyakarta", "DKI Jakarta", "Jawa Barat"]);

    let cached = state.cache.get(keys::PROVINCES).await.expect("cache filled");
    let cached: serde_json::Value = serde_json::from_str(&cached).unwrap();
    assert_eq!(cached, body);
}

#[tokio::test]
async fn test_cached_value_is_served_until_it_expires() {
    let state = setup_test_state().await;
    let router = app(&state);

    let stale = json!([{ "id": 99, "name": "Cached Province" }]);
    state
        .cache
        .set(keys::PROVINCES, stale.to_string(), Duration::from_secs(60))
        .await;

    let (status, body) = send(&router, "GET", "/locations/provinces", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stale);

    state.cache.delete(keys::PROVINCES).await;
    let (_, body) = send(&router, "GET", "/locations/provinces", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_corrupt_cache_entry_falls_through_to_database() {
    let state = setup_test_state().await;
    let router = app(&state);

    let key = keys::cities(32);
    state
        .cache
        .set(&key, "{not json".to_string(), Duration::from_secs(60))
        .await;

    let (status, body) = send(&router, "GET", "/locations/provinces/32/cities", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let cities = body.as_array().unwrap();
    assert_eq!(cities.len(), 2);
    assert!(cities.iter().all(|c| c["name"] == "Bandung"));

    // the broken entry was replaced with the fresh list
    let refreshed = state.cache.get(&key).await.expect("cache refilled");
    assert!(refreshed.starts_with('['));
}

#[tokio::test]
async fn test_walks_the_hierarchy() {
    let state = setup_test_state().await;
    let router = app(&state);

    let (status, body) = send(&router, "GET", "/locations/cities/3171/districts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kebayoran Baru", "Tebet"]);

    let (status, body) = send(
        &router,
        "GET",
        "/locations/districts/317101/subdistricts",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Melawai");
    assert_eq!(body[1]["name"], "Senayan");
    assert_eq!(body[1]["postal_code"], "12190");

    let (status, body) = send(&router, "GET", "/locations/subdistricts/3273011", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dago");
}

#[tokio::test]
async fn test_unknown_parent_is_not_found() {
    let state = setup_test_state().await;
    let router = app(&state);

    for uri in [
        "/locations/provinces/99/cities",
        "/locations/cities/9999/districts",
        "/locations/districts/999999/subdistricts",
        "/locations/subdistricts/1",
    ] {
        let (status, body) = send(&router, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "not_found");
    }

    // misses are not cached
    assert!(state.cache.get(&keys::cities(99)).await.is_none());
}
