// SPDX-License-Identifier: MIT

//! Authkeyper: a third-party user-authentication broker.
//!
//! Platforms register once and receive an API key; their end-users
//! register and sign in through this service and get short-lived
//! session tokens the platform can verify.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::CredentialStore;
use services::ValidationRules;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: CredentialStore,
    pub rules: ValidationRules,
}
