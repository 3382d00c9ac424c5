//! Platform client model for storage and API.

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// A registered platform, stored in the `clients` collection.
///
/// The document ID is the platform's API key; the key is never
/// duplicated inside the document itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Platform owner's name
    pub name: String,
    /// Owner email, unique across clients
    pub email: String,
    /// Owner phone, unique across clients
    pub phone: String,
    /// Argon2id PHC string for the owner's credential
    pub hashed_password: String,
    /// Public platform name shown to end-users
    pub platform_name: String,
    /// Secondary identifier, unique across clients
    pub platform_id: String,
    /// Platform logo URL
    pub image_url: String,
    /// Snapshots of users who signed in through this platform, append-only
    #[serde(default)]
    pub user_activity_log: Vec<ClientLogEntry>,
}

/// One user snapshot in a client's activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLogEntry {
    pub email: String,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl ClientLogEntry {
    /// Snapshot a user's public profile at sign-in time.
    pub fn snapshot_of(user: &User, timestamp: i64) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            image_url: user.image_url.clone(),
            timestamp,
        }
    }
}
