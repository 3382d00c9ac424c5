// SPDX-License-Identifier: MIT

//! Platform (client) registration and lookup routes.

use axum::{
    extract::{Path, State},
    http::Uri,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{collections, fields, Keyspace};
use crate::error::{AppError, Envelope, Result};
use crate::models::{Client, ClientLogEntry};
use crate::routes::params::PathParams;
use crate::services::issuer::{self, issue_unique, random_token};
use crate::services::password;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register/{*params}", post(register_platform))
        .route("/apikey/{apikey}", get(client_by_apikey))
        .route("/redirect/{target}/{apikey}", get(redirect_to_signin))
}

/// Client record as returned to callers: the stored profile plus the
/// API key, minus the credential hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub apikey: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub platform_name: String,
    pub platform_id: String,
    pub image_url: String,
    pub user_activity_log: Vec<ClientLogEntry>,
}

impl ClientResponse {
    fn new(apikey: &str, client: Client) -> Self {
        Self {
            apikey: apikey.to_string(),
            name: client.name,
            email: client.email,
            phone: client.phone,
            platform_name: client.platform_name,
            platform_id: client.platform_id,
            image_url: client.image_url,
            user_activity_log: client.user_activity_log,
        }
    }
}

/// Register a platform and issue its API key.
///
/// `POST /register/name=../email=../phone=../platformname=../hashedpass=../imageurl=..`
async fn register_platform(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Json<Envelope<ClientResponse>>> {
    let params = PathParams::from_path(uri.path(), "/register/")?;
    let name = params.required("name")?;
    let email = params.required("email")?;
    let phone = params.required("phone")?;
    let platform_name = params.required("platformname")?;
    let hashed_pass = params.required("hashedpass")?;
    let image_url = params.required("imageurl")?;

    if !state.rules.is_valid_email(email) {
        return Err(AppError::InvalidEmail);
    }
    if !state.rules.is_valid_phone(phone) {
        return Err(AppError::InvalidPhone);
    }

    if state
        .db
        .is_taken(Keyspace::field(collections::CLIENTS, fields::EMAIL), email)
        .await?
    {
        return Err(AppError::DuplicateClientEmail);
    }
    if state
        .db
        .is_taken(Keyspace::field(collections::CLIENTS, fields::PHONE), phone)
        .await?
    {
        return Err(AppError::DuplicateClientPhone);
    }

    let retry_cap = state.config.issue_retry_cap;
    let api_key = issue_unique(
        &state.db,
        Keyspace::document_id(collections::CLIENTS),
        retry_cap,
        || random_token(issuer::API_KEY_LENGTH, issuer::DEFAULT_ALPHABET),
    )
    .await
    .map_err(|e| e.into_app_error("API keys"))?;

    let platform_id = issue_unique(
        &state.db,
        Keyspace::field(collections::CLIENTS, fields::PLATFORM_ID),
        retry_cap,
        || random_token(issuer::PLATFORM_ID_LENGTH, issuer::DEFAULT_ALPHABET),
    )
    .await
    .map_err(|e| e.into_app_error("platform IDs"))?;

    let client = Client {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        hashed_password: password::hash_password(hashed_pass)?,
        platform_name: platform_name.to_string(),
        platform_id,
        image_url: image_url.to_string(),
        user_activity_log: Vec::new(),
    };

    state.db.upsert_client(&api_key, &client).await?;

    tracing::info!(
        platform_id = %client.platform_id,
        platform_name = %client.platform_name,
        "Client registered"
    );

    Ok(Json(Envelope::ok_with_message(
        "Client registered successfully",
        ClientResponse::new(&api_key, client),
    )))
}

/// Fetch a client record by API key. `GET /apikey/{apikey}`
async fn client_by_apikey(
    State(state): State<Arc<AppState>>,
    Path(apikey): Path<String>,
) -> Result<Json<Envelope<ClientResponse>>> {
    let client = state
        .db
        .get_client(&apikey)
        .await?
        .ok_or(AppError::ClientNotFound)?;

    Ok(Json(Envelope::ok(ClientResponse::new(&apikey, client))))
}

/// Forward a browser to the hosted sign-in page, carrying the original
/// target URL and the platform's API key. `GET /redirect/{target}/{apikey}`
async fn redirect_to_signin(
    State(state): State<Arc<AppState>>,
    Path((target, apikey)): Path<(String, String)>,
) -> Result<Redirect> {
    if target.is_empty() {
        return Err(AppError::MissingParam("target"));
    }
    if apikey.is_empty() {
        return Err(AppError::MissingParam("apikey"));
    }

    let destination = format!(
        "{}/target/{}/apikey/{}",
        state.config.redirect_base_url,
        urlencoding::encode(&target),
        apikey
    );

    tracing::info!(target = %target, "Redirecting to hosted sign-in");

    Ok(Redirect::temporary(&destination))
}
