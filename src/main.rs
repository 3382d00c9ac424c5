// SPDX-License-Identifier: MIT

//! Authkeyper API Server
//!
//! A third-party authentication broker: platforms register for an API
//! key, then register and sign in their end-users here in exchange for
//! short-lived session tokens.

use authkeyper::{config::Config, db::CredentialStore, services::ValidationRules, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Authkeyper API");

    // Compile validation rules up front; a bad phone pattern should
    // fail the boot, not the first request
    let rules = ValidationRules::new(&config.phone_pattern).expect("Invalid phone pattern");

    // Connect the configured credential store
    let db = CredentialStore::connect(&config)
        .await
        .expect("Failed to connect credential store");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        rules,
    });

    // Build router
    let app = authkeyper::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("authkeyper=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
