//! Storage layer over the credential collections.
//!
//! Handlers never talk to a database client directly; everything goes
//! through [`CredentialStore`], so the in-memory backend can stand in
//! for Firestore in tests and local development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use std::time::Duration;

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::models::{Client, SessionToken, User};

/// Collection names as constants.
pub mod collections {
    pub const CLIENTS: &str = "clients";
    pub const USERS: &str = "users";
    pub const TOKENS: &str = "tokens";
}

/// Stored field names used in equality probes. These are the serialized
/// (camelCase) names, so they can be handed to Firestore queries as-is.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const PLATFORM_ID: &str = "platformId";
}

/// A uniqueness keyspace: either the document IDs of a collection, or a
/// named field inside its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyspace<'a> {
    DocumentId { collection: &'a str },
    Field { collection: &'a str, field: &'a str },
}

impl<'a> Keyspace<'a> {
    pub const fn document_id(collection: &'a str) -> Self {
        Keyspace::DocumentId { collection }
    }

    pub const fn field(collection: &'a str, field: &'a str) -> Self {
        Keyspace::Field { collection, field }
    }
}

/// Credential store over the clients, users and tokens collections.
#[derive(Clone)]
pub enum CredentialStore {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

impl CredentialStore {
    /// Connect the backend selected by configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.store_backend {
            StoreBackend::Firestore => {
                let store = FirestoreStore::new(
                    &config.gcp_project_id,
                    Duration::from_secs(config.db_timeout_secs),
                )
                .await?;
                Ok(CredentialStore::Firestore(store))
            }
            StoreBackend::Memory => Ok(CredentialStore::Memory(MemoryStore::new())),
        }
    }

    /// An empty in-memory store, for tests.
    pub fn in_memory() -> Self {
        CredentialStore::Memory(MemoryStore::new())
    }

    /// Get a client by API key.
    pub async fn get_client(&self, api_key: &str) -> Result<Option<Client>, AppError> {
        match self {
            CredentialStore::Firestore(db) => db.get_client(api_key).await,
            CredentialStore::Memory(db) => db.get_client(api_key).await,
        }
    }

    /// Create or update a client document under its API key.
    pub async fn upsert_client(&self, api_key: &str, client: &Client) -> Result<(), AppError> {
        match self {
            CredentialStore::Firestore(db) => db.upsert_client(api_key, client).await,
            CredentialStore::Memory(db) => db.upsert_client(api_key, client).await,
        }
    }

    /// Get a user by phone number (the document ID).
    pub async fn get_user(&self, phone: &str) -> Result<Option<User>, AppError> {
        match self {
            CredentialStore::Firestore(db) => db.get_user(phone).await,
            CredentialStore::Memory(db) => db.get_user(phone).await,
        }
    }

    /// Find a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            CredentialStore::Firestore(db) => db.find_user_by_email(email).await,
            CredentialStore::Memory(db) => db.find_user_by_email(email).await,
        }
    }

    /// Create or update a user document.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            CredentialStore::Firestore(db) => db.upsert_user(user).await,
            CredentialStore::Memory(db) => db.upsert_user(user).await,
        }
    }

    /// Get a session token record.
    pub async fn get_token(&self, token: &str) -> Result<Option<SessionToken>, AppError> {
        match self {
            CredentialStore::Firestore(db) => db.get_token(token).await,
            CredentialStore::Memory(db) => db.get_token(token).await,
        }
    }

    /// Store a session token record under the token string.
    pub async fn set_token(&self, token: &str, record: &SessionToken) -> Result<(), AppError> {
        match self {
            CredentialStore::Firestore(db) => db.set_token(token, record).await,
            CredentialStore::Memory(db) => db.set_token(token, record).await,
        }
    }

    /// Persist the paired sign-in writes (updated user log, updated
    /// client log) so that neither log can lag the other.
    pub async fn record_sign_in(
        &self,
        api_key: &str,
        client: &Client,
        user: &User,
    ) -> Result<(), AppError> {
        match self {
            CredentialStore::Firestore(db) => db.record_sign_in(api_key, client, user).await,
            CredentialStore::Memory(db) => db.record_sign_in(api_key, client, user).await,
        }
    }

    /// Whether `value` is already present in the given keyspace.
    pub async fn is_taken(&self, keyspace: Keyspace<'_>, value: &str) -> Result<bool, AppError> {
        match self {
            CredentialStore::Firestore(db) => db.is_taken(keyspace, value).await,
            CredentialStore::Memory(db) => db.is_taken(keyspace, value).await,
        }
    }
}
