// SPDX-License-Identifier: MIT

//! In-memory credential store for tests and local development.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::{collections, fields, Keyspace};
use crate::error::AppError;
use crate::models::{Client, SessionToken, User};

/// HashMap-backed store with the same operations as the Firestore
/// backend. All three collections sit behind one mutex, which is what
/// makes `record_sign_in` atomic here.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

#[derive(Default)]
struct Collections {
    clients: HashMap<String, Client>,
    users: HashMap<String, User>,
    tokens: HashMap<String, SessionToken>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn get_client(&self, api_key: &str) -> Result<Option<Client>, AppError> {
        Ok(self.lock().clients.get(api_key).cloned())
    }

    pub async fn upsert_client(&self, api_key: &str, client: &Client) -> Result<(), AppError> {
        self.lock()
            .clients
            .insert(api_key.to_string(), client.clone());
        Ok(())
    }

    pub async fn get_user(&self, phone: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.get(phone).cloned())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.lock().users.insert(user.phone.clone(), user.clone());
        Ok(())
    }

    pub async fn get_token(&self, token: &str) -> Result<Option<SessionToken>, AppError> {
        Ok(self.lock().tokens.get(token).cloned())
    }

    pub async fn set_token(&self, token: &str, record: &SessionToken) -> Result<(), AppError> {
        self.lock()
            .tokens
            .insert(token.to_string(), record.clone());
        Ok(())
    }

    /// Both sign-in writes land under one lock acquisition.
    pub async fn record_sign_in(
        &self,
        api_key: &str,
        client: &Client,
        user: &User,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();
        inner.users.insert(user.phone.clone(), user.clone());
        inner
            .clients
            .insert(api_key.to_string(), client.clone());
        Ok(())
    }

    pub async fn is_taken(&self, keyspace: Keyspace<'_>, value: &str) -> Result<bool, AppError> {
        let inner = self.lock();
        let taken = match keyspace {
            Keyspace::DocumentId {
                collection: collections::CLIENTS,
            } => inner.clients.contains_key(value),
            Keyspace::DocumentId {
                collection: collections::USERS,
            } => inner.users.contains_key(value),
            Keyspace::DocumentId {
                collection: collections::TOKENS,
            } => inner.tokens.contains_key(value),
            Keyspace::Field {
                collection: collections::CLIENTS,
                field: fields::EMAIL,
            } => inner.clients.values().any(|c| c.email == value),
            Keyspace::Field {
                collection: collections::CLIENTS,
                field: fields::PHONE,
            } => inner.clients.values().any(|c| c.phone == value),
            Keyspace::Field {
                collection: collections::CLIENTS,
                field: fields::PLATFORM_ID,
            } => inner.clients.values().any(|c| c.platform_id == value),
            Keyspace::Field {
                collection: collections::USERS,
                field: fields::EMAIL,
            } => inner.users.values().any(|u| u.email == value),
            other => {
                return Err(AppError::Database(format!(
                    "Unsupported keyspace: {:?}",
                    other
                )));
            }
        };
        Ok(taken)
    }
}
