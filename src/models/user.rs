//! End-user model for storage and API.

use serde::{Deserialize, Serialize};

use crate::models::client::Client;

/// An end-user, stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Display name
    pub name: String,
    /// Email address, unique across users
    pub email: String,
    /// Phone number (also used as document ID)
    pub phone: String,
    /// Argon2id PHC string for the user's credential
    pub hashed_password: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the user registered, epoch milliseconds
    pub created_at: i64,
    /// What happened on this account, append-only
    #[serde(default)]
    pub activity_log: Vec<UserLogEntry>,
}

/// One entry in a user's activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogEntry {
    /// What happened: "registered" or "sign_in"
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl UserLogEntry {
    /// Entry written once, at account creation.
    pub fn registered(timestamp: i64) -> Self {
        Self {
            action: "registered".to_string(),
            platform_name: None,
            platform_id: None,
            apikey: None,
            timestamp,
        }
    }

    /// Entry recording a sign-in through the given platform.
    pub fn sign_in(client: &Client, apikey: &str, timestamp: i64) -> Self {
        Self {
            action: "sign_in".to_string(),
            platform_name: Some(client.platform_name.clone()),
            platform_id: Some(client.platform_id.clone()),
            apikey: Some(apikey.to_string()),
            timestamp,
        }
    }
}
