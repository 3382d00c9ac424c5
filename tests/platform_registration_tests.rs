// SPDX-License-Identifier: MIT

//! Platform registration, lookup and redirect tests.

use axum::http::{header, StatusCode};

mod common;

#[tokio::test]
async fn test_register_platform_issues_identifiers() {
    let (app, state) = common::create_test_app();

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/register/name=Owner/email=owner%40example.com/phone=9123456789/platformname=Acme/hashedpass=ownersecret/imageurl=https%3A%2F%2Fexample.com%2Flogo.png",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let apikey = body["data"]["apikey"].as_str().unwrap();
    let platform_id = body["data"]["platformId"].as_str().unwrap();
    assert_eq!(apikey.len(), 9);
    assert_eq!(platform_id.len(), 6);
    assert_eq!(body["data"]["email"], "owner@example.com");
    assert_eq!(body["data"]["platformName"], "Acme");
    assert_eq!(body["data"]["userActivityLog"].as_array().unwrap().len(), 0);

    // The credential hash never leaves the server.
    assert!(body["data"].get("hashedPassword").is_none());

    // The key now resolves to a stored client.
    let stored = state.db.get_client(apikey).await.unwrap().unwrap();
    assert_eq!(stored.platform_id, platform_id);
}

#[tokio::test]
async fn test_register_stores_argon2_hash_not_plaintext() {
    let (app, state) = common::create_test_app();
    let apikey = common::register_platform(&app, "owner@example.com", "9123456789").await;

    let stored = state.db.get_client(&apikey).await.unwrap().unwrap();
    assert!(stored.hashed_password.starts_with("$argon2id$"));
    assert_ne!(stored.hashed_password, "ownersecret");
}

#[tokio::test]
async fn test_duplicate_email_rejected_with_400() {
    let (app, _state) = common::create_test_app();
    common::register_platform(&app, "owner@example.com", "9123456789").await;

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/register/name=Other/email=owner%40example.com/phone=9000000000/platformname=Other/hashedpass=x/imageurl=i",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCode"], "DUPLICATE_EMAIL");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("please log in to your current account"));
}

#[tokio::test]
async fn test_duplicate_phone_rejected_with_400() {
    let (app, _state) = common::create_test_app();
    common::register_platform(&app, "owner@example.com", "9123456789").await;

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/register/name=Other/email=other%40example.com/phone=9123456789/platformname=Other/hashedpass=x/imageurl=i",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "DUPLICATE_PHONE");
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/register/name=Owner/email=not-an-email/phone=9123456789/platformname=Acme/hashedpass=x/imageurl=i",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_EMAIL");
}

#[tokio::test]
async fn test_invalid_phone_rejected() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/register/name=Owner/email=owner%40example.com/phone=1234567890/platformname=Acme/hashedpass=x/imageurl=i",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_PHONE");
}

#[tokio::test]
async fn test_missing_parameter_rejected() {
    let (app, _state) = common::create_test_app();

    // No imageurl segment.
    let (status, body) = common::send_json(
        &app,
        "POST",
        "/register/name=Owner/email=owner%40example.com/phone=9123456789/platformname=Acme/hashedpass=x",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "MISSING_PARAM");
}

#[tokio::test]
async fn test_two_platforms_get_distinct_identifiers() {
    let (app, state) = common::create_test_app();
    let key_a = common::register_platform(&app, "a@example.com", "9111111111").await;
    let key_b = common::register_platform(&app, "b@example.com", "9222222222").await;

    assert_ne!(key_a, key_b);

    let a = state.db.get_client(&key_a).await.unwrap().unwrap();
    let b = state.db.get_client(&key_b).await.unwrap().unwrap();
    assert_ne!(a.platform_id, b.platform_id);
}

#[tokio::test]
async fn test_client_lookup_by_apikey() {
    let (app, _state) = common::create_test_app();
    let apikey = common::register_platform(&app, "owner@example.com", "9123456789").await;

    let (status, body) = common::send_json(&app, "GET", &format!("/apikey/{}", apikey)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["apikey"], apikey.as_str());
    assert_eq!(body["data"]["email"], "owner@example.com");

    let (status, body) = common::send_json(&app, "GET", "/apikey/n0tAr3alK").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "CLIENT_NOT_FOUND");
}

#[tokio::test]
async fn test_redirect_builds_encoded_location() {
    let (app, _state) = common::create_test_app();

    let response = common::send(
        &app,
        "GET",
        "/redirect/https%3A%2F%2Fapp.example%2Fdash/k3yK3yK3y",
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(
        location,
        "https://authkeyper.vercel.app/target/https%3A%2F%2Fapp.example%2Fdash/apikey/k3yK3yK3y"
    );
}
