mod common;

use axum::http::StatusCode;
use kedai::domain::{Address, DomainError};
use kedai::infrastructure::AppState;
use kedai::services::address_service::{self, AddressInput, AddressUpdate};
use serde_json::json;

use common::{app, register_user, send, senayan_address, setup_test_state};

fn input(label: &str, is_default: bool, is_pickup: bool) -> AddressInput {
    AddressInput {
        label: label.to_string(),
        recipient_name: "Budi Santoso".to_string(),
        phone: "081234567890".to_string(),
        province_id: 32,
        city_id: 3273,
        district_id: 327301,
        subdistrict_id: 3273011,
        postal_code: None,
        detail: "Jl. Ir. H. Juanda No. 100".to_string(),
        is_default,
        is_pickup,
    }
}

fn default_id(addresses: &[Address]) -> Option<i32> {
    addresses.iter().find(|a| a.is_default).map(|a| a.id)
}

fn pickup_id(addresses: &[Address]) -> Option<i32> {
    addresses.iter().find(|a| a.is_pickup).map(|a| a.id)
}

/// Exactly one default and one pickup while any address remains
async fn assert_invariant(state: &AppState, user_id: i32) -> Vec<Address> {
    let addresses = address_service::list_addresses(state, user_id)
        .await
        .unwrap();
    let defaults = addresses.iter().filter(|a| a.is_default).count();
    let pickups = addresses.iter().filter(|a| a.is_pickup).count();
    if addresses.is_empty() {
        assert_eq!((defaults, pickups), (0, 0));
    } else {
        assert_eq!(defaults, 1, "defaults in {:?}", addresses);
        assert_eq!(pickups, 1, "pickups in {:?}", addresses);
    }
    addresses
}

async fn new_user(state: &AppState, username: &str) -> i32 {
    let router = app(state);
    register_user(&router, username).await.0
}

#[tokio::test]
async fn test_first_address_takes_both_flags() {
    let state = setup_test_state().await;
    let user_id = new_user(&state, "budi").await;

    let first = address_service::create_address(&state, user_id, input("Rumah", false, false))
        .await
        .unwrap();
    assert!(first.is_default);
    assert!(first.is_pickup);
    assert_eq!(first.postal_code, "40135");
    assert_eq!(first.city_name.as_deref(), Some("Bandung"));
    assert_eq!(first.subdistrict_name.as_deref(), Some("Dago"));

    assert_invariant(&state, user_id).await;
}

#[tokio::test]
async fn test_flags_move_across_a_sequence_of_operations() {
    let state = setup_test_state().await;
    let user_id = new_user(&state, "sari").await;

    let a = address_service::create_address(&state, user_id, input("A", false, false))
        .await
        .unwrap();
    let b = address_service::create_address(&state, user_id, input("B", true, false))
        .await
        .unwrap();
    let list = assert_invariant(&state, user_id).await;
    assert_eq!(default_id(&list), Some(b.id));
    assert_eq!(pickup_id(&list), Some(a.id));
    // default first, then newest
    assert_eq!(list[0].id, b.id);

    let c = address_service::create_address(&state, user_id, input("C", false, true))
        .await
        .unwrap();
    let list = assert_invariant(&state, user_id).await;
    assert_eq!(default_id(&list), Some(b.id));
    assert_eq!(pickup_id(&list), Some(c.id));

    let update = AddressUpdate {
        is_default: Some(true),
        ..Default::default()
    };
    address_service::update_address(&state, user_id, a.id, update)
        .await
        .unwrap();
    let list = assert_invariant(&state, user_id).await;
    assert_eq!(default_id(&list), Some(a.id));

    address_service::set_pickup_address(&state, user_id, b.id)
        .await
        .unwrap();
    address_service::set_default_address(&state, user_id, c.id)
        .await
        .unwrap();
    let list = assert_invariant(&state, user_id).await;
    assert_eq!(default_id(&list), Some(c.id));
    assert_eq!(pickup_id(&list), Some(b.id));

    // c held default: the oldest remaining (a) inherits it
    address_service::delete_address(&state, user_id, c.id)
        .await
        .unwrap();
    let list = assert_invariant(&state, user_id).await;
    assert_eq!(default_id(&list), Some(a.id));
    assert_eq!(pickup_id(&list), Some(b.id));

    address_service::delete_address(&state, user_id, a.id)
        .await
        .unwrap();
    let list = assert_invariant(&state, user_id).await;
    assert_eq!(list.len(), 1);
    assert_eq!(default_id(&list), Some(b.id));
    assert_eq!(pickup_id(&list), Some(b.id));

    address_service::delete_address(&state, user_id, b.id)
        .await
        .unwrap();
    assert!(assert_invariant(&state, user_id).await.is_empty());

    // starting over: the next address is the first again
    let d = address_service::create_address(&state, user_id, input("D", false, false))
        .await
        .unwrap();
    assert!(d.is_default && d.is_pickup);
}

#[tokio::test]
async fn test_unsetting_a_held_flag_is_rejected() {
    let state = setup_test_state().await;
    let user_id = new_user(&state, "andi").await;

    let a = address_service::create_address(&state, user_id, input("A", false, false))
        .await
        .unwrap();
    let b = address_service::create_address(&state, user_id, input("B", false, false))
        .await
        .unwrap();

    let lower_default = AddressUpdate {
        is_default: Some(false),
        ..Default::default()
    };
    let result = address_service::update_address(&state, user_id, a.id, lower_default.clone()).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    // b never held the flag, so lowering it changes nothing
    let unchanged = address_service::update_address(&state, user_id, b.id, lower_default)
        .await
        .unwrap();
    assert!(!unchanged.is_default);

    let list = assert_invariant(&state, user_id).await;
    assert_eq!(default_id(&list), Some(a.id));
}

#[tokio::test]
async fn test_location_chain_is_validated() {
    let state = setup_test_state().await;
    let user_id = new_user(&state, "dewi").await;

    let mut wrong_city = input("Rumah", false, false);
    wrong_city.city_id = 3171; // Jakarta Selatan is not in Jawa Barat
    let result = address_service::create_address(&state, user_id, wrong_city).await;
    assert!(matches!(result, Err(DomainError::Validation(msg)) if msg.contains("city_id")));

    let a = address_service::create_address(&state, user_id, input("Rumah", false, false))
        .await
        .unwrap();
    let moved_subdistrict = AddressUpdate {
        subdistrict_id: Some(3171011),
        ..Default::default()
    };
    let result = address_service::update_address(&state, user_id, a.id, moved_subdistrict).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_moving_subdistrict_refreshes_postal_code() {
    let state = setup_test_state().await;
    let user_id = new_user(&state, "rina").await;

    let a = address_service::create_address(&state, user_id, input("Kantor", false, false))
        .await
        .unwrap();
    assert_eq!(a.postal_code, "40135");

    let to_lebak_siliwangi = AddressUpdate {
        subdistrict_id: Some(3273012),
        ..Default::default()
    };
    let moved = address_service::update_address(&state, user_id, a.id, to_lebak_siliwangi)
        .await
        .unwrap();
    assert_eq!(moved.subdistrict_id, 3273012);
    assert_eq!(moved.postal_code, "40132");

    // an explicit code wins over the subdistrict's
    let back_to_dago = AddressUpdate {
        subdistrict_id: Some(3273011),
        postal_code: Some("40999".to_string()),
        ..Default::default()
    };
    let moved = address_service::update_address(&state, user_id, a.id, back_to_dago)
        .await
        .unwrap();
    assert_eq!(moved.postal_code, "40999");

    // restating the same subdistrict keeps a custom code
    let same_place = AddressUpdate {
        subdistrict_id: Some(3273011),
        ..Default::default()
    };
    let kept = address_service::update_address(&state, user_id, a.id, same_place)
        .await
        .unwrap();
    assert_eq!(kept.postal_code, "40999");
}

#[tokio::test]
async fn test_addresses_are_private_over_http() {
    let state = setup_test_state().await;
    let router = app(&state);
    let (_, owner) = register_user(&router, "owner").await;
    let (_, other) = register_user(&router, "other").await;

    let (status, created) = send(
        &router,
        "POST",
        "/users/me/addresses",
        Some(&owner),
        Some(senayan_address("Kantor")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_default"], json!(true));
    let id = created["id"].as_i64().unwrap();

    let uri = format!("/users/me/addresses/{}", id);
    let (status, _) = send(&router, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "GET", "/users/me/addresses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &router,
        "PUT",
        &uri,
        Some(&owner),
        Some(json!({ "is_pickup": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&router, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&router, "GET", "/users/me/addresses", Some(&owner), None).await;
    assert_eq!(list, json!([]));
}
