// SPDX-License-Identifier: MIT

//! Sign-in flow: authenticate an end-user on behalf of a platform and
//! issue a short-lived session token.

use axum::{extract::State, http::Uri, routing::get, Json, Router};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{collections, Keyspace};
use crate::error::{AppError, Envelope, Result};
use crate::models::{ClientLogEntry, SessionToken, UserLogEntry};
use crate::routes::params::PathParams;
use crate::services::issuer::{self, issue_unique, random_token, IssueError};
use crate::services::password;
use crate::services::validation::UsernameKind;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/signin/{*params}", get(sign_in))
}

/// Issued session token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    /// Epoch milliseconds
    pub expiry_timestamp: i64,
}

/// Sign a user in through a platform.
///
/// `GET /signin/username=../password=../apikey=..` where the username
/// may be an email or a phone number. Every step is a hard stop:
/// resolve the API key, classify the username, find the user, verify
/// the password, record the activity, then issue the token.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Json<Envelope<SignInResponse>>> {
    let params = PathParams::from_path(uri.path(), "/signin/")?;
    let username = params.required("username")?;
    let pass = params.required("password")?;
    let apikey = params.required("apikey")?;

    let mut client = state
        .db
        .get_client(apikey)
        .await?
        .ok_or(AppError::InvalidApiKey)?;

    let user = match state.rules.classify_username(username)? {
        UsernameKind::Email => state.db.find_user_by_email(username).await?,
        UsernameKind::Phone => state.db.get_user(username).await?,
    };
    let mut user = user.ok_or(AppError::UserNotFound)?;

    if !password::verify_password(pass, &user.hashed_password) {
        tracing::warn!(platform_id = %client.platform_id, "Sign-in rejected: bad credentials");
        return Err(AppError::InvalidCredentials);
    }

    // Both activity logs move together; the store commits the pair
    // atomically.
    let now = Utc::now().timestamp_millis();
    user.activity_log
        .push(UserLogEntry::sign_in(&client, apikey, now));
    client
        .user_activity_log
        .push(ClientLogEntry::snapshot_of(&user, now));
    state.db.record_sign_in(apikey, &client, &user).await?;

    let token = match issue_unique(
        &state.db,
        Keyspace::document_id(collections::TOKENS),
        state.config.issue_retry_cap,
        || random_token(issuer::SESSION_TOKEN_LENGTH, issuer::DEFAULT_ALPHABET),
    )
    .await
    {
        Ok(token) => token,
        Err(IssueError::Exhausted { attempts }) => {
            tracing::error!(attempts, "Session token space exhausted");
            return Err(AppError::TokenIssuanceFailed);
        }
        Err(IssueError::Store(e)) => return Err(e),
    };

    let expiry_timestamp =
        now + Duration::minutes(state.config.token_ttl_minutes).num_milliseconds();
    let record = SessionToken::for_user(&user, expiry_timestamp);
    state.db.set_token(&token, &record).await?;

    tracing::info!(platform_id = %client.platform_id, "Sign-in succeeded, token issued");

    Ok(Json(Envelope::ok(SignInResponse {
        token,
        expiry_timestamp,
    })))
}
