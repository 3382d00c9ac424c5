// SPDX-License-Identifier: MIT

//! Firestore-backed credential store.
//!
//! Provides typed operations over:
//! - Clients (platform records, keyed by API key)
//! - Users (end-user records, keyed by phone number)
//! - Tokens (session token records, keyed by the token string)

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::db::{collections, fields, Keyspace};
use crate::error::AppError;
use crate::models::{Client, SessionToken, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
    /// Per-call deadline; a hung Firestore call must not hang the request.
    op_timeout: Duration,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, op_timeout: Duration) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, op_timeout).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client, op_timeout })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        project_id: &str,
        op_timeout: Duration,
    ) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client, op_timeout })
    }

    /// Run a Firestore call under the per-call deadline. Timeouts surface
    /// as `Unavailable`, which answers 503 rather than 500.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, AppError>
    where
        F: std::future::Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Unavailable(format!(
                "{} timed out after {:?}",
                op, self.op_timeout
            ))),
        }
    }

    // ─── Client Operations ───────────────────────────────────────

    /// Get a client by API key.
    pub async fn get_client(&self, api_key: &str) -> Result<Option<Client>, AppError> {
        self.bounded("get client", async {
            self.client
                .fluent()
                .select()
                .by_id_in(collections::CLIENTS)
                .obj()
                .one(api_key)
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        })
        .await
    }

    /// Create or update a client document under its API key.
    pub async fn upsert_client(&self, api_key: &str, client: &Client) -> Result<(), AppError> {
        self.bounded("upsert client", async {
            let _: () = self
                .client
                .fluent()
                .update()
                .in_col(collections::CLIENTS)
                .document_id(api_key)
                .object(client)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(())
        })
        .await
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by phone number (the document ID).
    pub async fn get_user(&self, phone: &str) -> Result<Option<User>, AppError> {
        self.bounded("get user", async {
            self.client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(phone)
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        })
        .await
    }

    /// Find a user by email. Emails are unique, so one hit is enough.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        self.bounded("find user by email", async {
            let mut hits: Vec<User> = self
                .client
                .fluent()
                .select()
                .from(collections::USERS)
                .filter(move |q| q.for_all([q.field(fields::EMAIL).eq(email.clone())]))
                .limit(1)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(hits.pop())
        })
        .await
    }

    /// Create or update a user document.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.bounded("upsert user", async {
            let _: () = self
                .client
                .fluent()
                .update()
                .in_col(collections::USERS)
                .document_id(&user.phone)
                .object(user)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(())
        })
        .await
    }

    // ─── Token Operations ────────────────────────────────────────

    /// Get a session token record.
    pub async fn get_token(&self, token: &str) -> Result<Option<SessionToken>, AppError> {
        self.bounded("get token", async {
            self.client
                .fluent()
                .select()
                .by_id_in(collections::TOKENS)
                .obj()
                .one(token)
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        })
        .await
    }

    /// Store a session token record under the token string.
    pub async fn set_token(&self, token: &str, record: &SessionToken) -> Result<(), AppError> {
        self.bounded("set token", async {
            let _: () = self
                .client
                .fluent()
                .update()
                .in_col(collections::TOKENS)
                .document_id(token)
                .object(record)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(())
        })
        .await
    }

    // ─── Atomic Sign-In Recording ────────────────────────────────

    /// Persist the paired sign-in writes in one Firestore transaction so
    /// the user's log and the client's log move together or not at all.
    pub async fn record_sign_in(
        &self,
        api_key: &str,
        client: &Client,
        user: &User,
    ) -> Result<(), AppError> {
        self.bounded("record sign-in", async {
            let mut transaction = self
                .client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            self.client
                .fluent()
                .update()
                .in_col(collections::USERS)
                .document_id(&user.phone)
                .object(user)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add user to transaction: {}", e))
                })?;

            self.client
                .fluent()
                .update()
                .in_col(collections::CLIENTS)
                .document_id(api_key)
                .object(client)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add client to transaction: {}", e))
                })?;

            transaction
                .commit()
                .await
                .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

            Ok(())
        })
        .await
    }

    // ─── Keyspace Probes ─────────────────────────────────────────

    /// Whether any document in `collection` has `field == value`.
    async fn field_exists<T>(
        &self,
        collection: &'static str,
        field: &str,
        value: &str,
    ) -> Result<bool, AppError>
    where
        T: DeserializeOwned + Send,
    {
        let field = field.to_string();
        let value = value.to_string();
        self.bounded("field probe", async {
            let hits: Vec<T> = self
                .client
                .fluent()
                .select()
                .from(collection)
                .filter(move |q| q.for_all([q.field(field.as_str()).eq(value.clone())]))
                .limit(1)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(!hits.is_empty())
        })
        .await
    }

    /// Whether `value` is already present in the given keyspace.
    pub async fn is_taken(&self, keyspace: Keyspace<'_>, value: &str) -> Result<bool, AppError> {
        match keyspace {
            Keyspace::DocumentId {
                collection: collections::CLIENTS,
            } => Ok(self.get_client(value).await?.is_some()),
            Keyspace::DocumentId {
                collection: collections::USERS,
            } => Ok(self.get_user(value).await?.is_some()),
            Keyspace::DocumentId {
                collection: collections::TOKENS,
            } => Ok(self.get_token(value).await?.is_some()),
            Keyspace::Field {
                collection: collections::CLIENTS,
                field,
            } => self.field_exists::<Client>(collections::CLIENTS, field, value).await,
            Keyspace::Field {
                collection: collections::USERS,
                field,
            } => self.field_exists::<User>(collections::USERS, field, value).await,
            other => Err(AppError::Database(format!(
                "Unsupported keyspace: {:?}",
                other
            ))),
        }
    }
}
