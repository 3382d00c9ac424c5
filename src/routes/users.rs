// SPDX-License-Identifier: MIT

//! End-user registration route.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::db::{collections, fields, Keyspace};
use crate::error::{AppError, Envelope, Result};
use crate::models::{User, UserLogEntry};
use crate::routes::params::PathParams;
use crate::services::password;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/registeruser/{*params}", get(register_user))
}

/// User record as returned to callers (no credential hash).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: i64,
    pub activity_log: Vec<UserLogEntry>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            phone: user.phone,
            image_url: user.image_url,
            created_at: user.created_at,
            activity_log: user.activity_log,
        }
    }
}

/// Register an end-user account, keyed by phone number.
///
/// `GET /registeruser/name=../email=../phone=../password=..` with an
/// optional `imageurl=..` segment. Answers 201 on success.
async fn register_user(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<(StatusCode, Json<Envelope<UserResponse>>)> {
    let params = PathParams::from_path(uri.path(), "/registeruser/")?;
    let name = params.required("name")?;
    let email = params.required("email")?;
    let phone = params.required("phone")?;
    let pass = params.required("password")?;
    let image_url = params.optional("imageurl").map(str::to_string);

    // Same format rules as platform registration, so sign-in can later
    // classify usernames with the patterns registration enforced.
    if !state.rules.is_valid_email(email) {
        return Err(AppError::InvalidEmail);
    }
    if !state.rules.is_valid_phone(phone) {
        return Err(AppError::InvalidPhone);
    }

    if state
        .db
        .is_taken(Keyspace::field(collections::USERS, fields::EMAIL), email)
        .await?
    {
        return Err(AppError::DuplicateUserEmail);
    }
    if state
        .db
        .is_taken(Keyspace::document_id(collections::USERS), phone)
        .await?
    {
        return Err(AppError::DuplicateUserPhone);
    }

    let now = Utc::now().timestamp_millis();
    let user = User {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        hashed_password: password::hash_password(pass)?,
        image_url,
        created_at: now,
        activity_log: vec![UserLogEntry::registered(now)],
    };

    state.db.upsert_user(&user).await?;

    tracing::info!(email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(
            "User registered successfully",
            UserResponse::from(user),
        )),
    ))
}
