// SPDX-License-Identifier: MIT

//! Session-token verification route.

use axum::{extract::State, http::Uri, routing::get, Json, Router};
use chrono::Utc;
use std::sync::Arc;

use crate::error::{AppError, Envelope, Result};
use crate::models::{SessionToken, TokenState};
use crate::routes::params::PathParams;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/checktoken/{*params}", get(check_token))
}

/// Verify a session token for a platform and return the signed-in
/// user's public profile.
///
/// `GET /checktoken/token=../apikey=..`
async fn check_token(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Json<Envelope<SessionToken>>> {
    let params = PathParams::from_path(uri.path(), "/checktoken/")?;
    let token = params.required("token")?;
    let apikey = params.required("apikey")?;

    if state.db.get_client(apikey).await?.is_none() {
        return Err(AppError::UnknownApiKey);
    }

    let record = state.db.get_token(token).await?;
    match TokenState::evaluate(record, Utc::now().timestamp_millis()) {
        TokenState::Valid(profile) => Ok(Json(Envelope::ok(profile))),
        TokenState::Expired => Err(AppError::TokenExpired),
        TokenState::NotFound => Err(AppError::TokenNotFound),
    }
}
