//! Session token model and verification states.

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// A short-lived session token, stored in the `tokens` collection with
/// the token string as document ID. The document carries the signed-in
/// user's public profile so verification needs no second lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the token stops verifying, epoch milliseconds
    pub expiry_timestamp: i64,
}

impl SessionToken {
    /// Build a token record from a user's public profile.
    pub fn for_user(user: &User, expiry_timestamp: i64) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            image_url: user.image_url.clone(),
            expiry_timestamp,
        }
    }
}

/// Outcome of evaluating a token lookup against the clock.
///
/// A stored record past its `expiryTimestamp` is `Expired`, never
/// `Valid`; storage holding a token is not enough to verify it.
#[derive(Debug, Clone)]
pub enum TokenState {
    Valid(SessionToken),
    Expired,
    NotFound,
}

impl TokenState {
    pub fn evaluate(record: Option<SessionToken>, now_millis: i64) -> Self {
        match record {
            None => TokenState::NotFound,
            Some(token) if now_millis > token.expiry_timestamp => TokenState::Expired,
            Some(token) => TokenState::Valid(token),
        }
    }
}
