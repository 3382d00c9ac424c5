// SPDX-License-Identifier: MIT

//! Unique identifier issuance.
//!
//! The broker's identifiers (API keys, platform IDs, session tokens)
//! are fixed-length random strings checked against their keyspace
//! before use. Issuance is a bounded generate-and-probe loop. The probe
//! and the later write are not transactional, so two concurrent
//! issuances can in principle race past the probe; at these identifier
//! lengths and request volumes the collision odds are accepted.

use rand::Rng;

use crate::db::{CredentialStore, Keyspace};
use crate::error::AppError;

/// Mixed-case letters and digits, 62 symbols.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const API_KEY_LENGTH: usize = 9;
pub const PLATFORM_ID_LENGTH: usize = 6;
pub const SESSION_TOKEN_LENGTH: usize = 6;

/// Why issuance stopped without a value.
#[derive(Debug)]
pub enum IssueError {
    /// Every candidate across `attempts` tries was already taken.
    Exhausted { attempts: u32 },
    /// The keyspace probe itself failed.
    Store(AppError),
}

impl IssueError {
    /// Collapse into the flow-level error, naming the identifier kind.
    pub fn into_app_error(self, what: &'static str) -> AppError {
        match self {
            IssueError::Exhausted { attempts } => {
                tracing::error!(attempts, what, "Identifier issuance exhausted");
                AppError::ResourceExhausted(what)
            }
            IssueError::Store(e) => e,
        }
    }
}

/// A fixed-length random string over `alphabet`, each position drawn
/// independently and uniformly from a CSPRNG.
pub fn random_token(length: usize, alphabet: &str) -> String {
    let symbols: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| symbols[rng.gen_range(0..symbols.len())])
        .collect()
}

/// Issue a value that was absent from `keyspace` at probe time.
///
/// `generate` produces candidates; the loop gives up after `retry_cap`
/// taken candidates rather than spinning forever on a dense keyspace.
pub async fn issue_unique<F>(
    store: &CredentialStore,
    keyspace: Keyspace<'_>,
    retry_cap: u32,
    mut generate: F,
) -> Result<String, IssueError>
where
    F: FnMut() -> String,
{
    for _ in 0..retry_cap {
        let candidate = generate();
        match store.is_taken(keyspace, &candidate).await {
            Ok(false) => return Ok(candidate),
            Ok(true) => continue,
            Err(e) => return Err(IssueError::Store(e)),
        }
    }
    Err(IssueError::Exhausted {
        attempts: retry_cap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collections;
    use crate::models::SessionToken;

    fn stored_token() -> SessionToken {
        SessionToken {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9123456789".to_string(),
            image_url: None,
            expiry_timestamp: i64::MAX,
        }
    }

    #[test]
    fn test_random_token_length_and_charset() {
        let token = random_token(API_KEY_LENGTH, DEFAULT_ALPHABET);
        assert_eq!(token.len(), 9);
        assert!(token.chars().all(|c| DEFAULT_ALPHABET.contains(c)));
    }

    #[test]
    fn test_random_token_respects_custom_alphabet() {
        let token = random_token(SESSION_TOKEN_LENGTH, "A");
        assert_eq!(token, "AAAAAA");
    }

    #[tokio::test]
    async fn test_issue_returns_first_free_candidate() {
        let store = CredentialStore::in_memory();
        let issued = issue_unique(
            &store,
            Keyspace::document_id(collections::TOKENS),
            10,
            || random_token(SESSION_TOKEN_LENGTH, DEFAULT_ALPHABET),
        )
        .await
        .unwrap();
        assert_eq!(issued.len(), 6);
    }

    #[tokio::test]
    async fn test_issue_skips_taken_candidates() {
        let store = CredentialStore::in_memory();
        store.set_token("taken1", &stored_token()).await.unwrap();

        let mut candidates = vec!["fresh1", "taken1"];
        let issued = issue_unique(
            &store,
            Keyspace::document_id(collections::TOKENS),
            10,
            || candidates.pop().unwrap().to_string(),
        )
        .await
        .unwrap();

        assert_eq!(issued, "fresh1");
    }

    #[tokio::test]
    async fn test_issue_stops_at_the_retry_cap() {
        let store = CredentialStore::in_memory();
        store.set_token("taken1", &stored_token()).await.unwrap();

        let mut calls = 0;
        let result = issue_unique(
            &store,
            Keyspace::document_id(collections::TOKENS),
            10,
            || {
                calls += 1;
                "taken1".to_string()
            },
        )
        .await;

        // The generator runs exactly as many times as the cap allows.
        assert_eq!(calls, 10);
        match result {
            Err(IssueError::Exhausted { attempts }) => assert_eq!(attempts, 10),
            other => panic!("expected Exhausted, got {:?}", other.map(|_| ())),
        }
    }
}
