// SPDX-License-Identifier: MIT

use authkeyper::config::Config;
use authkeyper::db::CredentialStore;
use authkeyper::routes::create_router;
use authkeyper::services::ValidationRules;
use authkeyper::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over the in-memory credential store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::default();
    let rules = ValidationRules::new(&config.phone_pattern).expect("test phone pattern");
    let db = CredentialStore::in_memory();

    let state = Arc::new(AppState { config, db, rules });

    (create_router(state.clone()), state)
}

/// Drive one request through the router and return the raw response.
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Drive one request and decode the JSON envelope.
#[allow(dead_code)]
pub async fn send_json(app: &Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = send(app, method, uri).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).expect("response body should be JSON");
    (status, body)
}

/// Register a platform through the API and return its issued API key.
#[allow(dead_code)]
pub async fn register_platform(app: &Router, email: &str, phone: &str) -> String {
    let uri = format!(
        "/register/name=Owner/email={}/phone={}/platformname=Acme/hashedpass=ownersecret/imageurl=https%3A%2F%2Fexample.com%2Flogo.png",
        urlencoding::encode(email),
        phone
    );
    let (status, body) = send_json(app, "POST", &uri).await;
    assert_eq!(status, StatusCode::OK, "platform registration failed: {}", body);
    body["data"]["apikey"]
        .as_str()
        .expect("apikey in response")
        .to_string()
}

/// Register an end-user through the API.
#[allow(dead_code)]
pub async fn register_user(app: &Router, name: &str, email: &str, phone: &str, password: &str) {
    let uri = format!(
        "/registeruser/name={}/email={}/phone={}/password={}",
        urlencoding::encode(name),
        urlencoding::encode(email),
        phone,
        urlencoding::encode(password)
    );
    let (status, body) = send_json(app, "GET", &uri).await;
    assert_eq!(status, StatusCode::CREATED, "user registration failed: {}", body);
}

/// Sign a user in and return the response envelope.
#[allow(dead_code)]
pub async fn sign_in(
    app: &Router,
    username: &str,
    password: &str,
    apikey: &str,
) -> (StatusCode, serde_json::Value) {
    let uri = format!(
        "/signin/username={}/password={}/apikey={}",
        urlencoding::encode(username),
        urlencoding::encode(password),
        apikey
    );
    send_json(app, "GET", &uri).await
}
