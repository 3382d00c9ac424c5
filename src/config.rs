//! Application configuration loaded from environment variables.
//!
//! Everything has a workable local-development default; production
//! deployments override through the environment (or a `.env` file).

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Which credential store backs the service
    pub store_backend: StoreBackend,
    /// Base URL of the hosted sign-in frontend, used by the redirect helper
    pub redirect_base_url: String,
    /// Phone validation pattern; regional numbering plans are a deployment
    /// concern, not a code change
    pub phone_pattern: String,
    /// Session token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// Per-call Firestore timeout in seconds
    pub db_timeout_secs: u64,
    /// Attempt cap when issuing unique identifiers
    pub issue_retry_cap: u32,
}

/// Credential store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 6969,
            gcp_project_id: "test-project".to_string(),
            store_backend: StoreBackend::Memory,
            redirect_base_url: "https://authkeyper.vercel.app".to_string(),
            phone_pattern: "^[6-9][0-9]{9}$".to_string(),
            token_ttl_minutes: 10,
            db_timeout_secs: 5,
            issue_retry_cap: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("firestore") | Err(_) => StoreBackend::Firestore,
            Ok("memory") => StoreBackend::Memory,
            Ok(other) => {
                return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string()));
            }
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "6969".to_string())
                .parse()
                .unwrap_or(6969),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            store_backend,
            redirect_base_url: env::var("REDIRECT_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://authkeyper.vercel.app".to_string()),
            phone_pattern: env::var("PHONE_PATTERN")
                .unwrap_or_else(|_| "^[6-9][0-9]{9}$".to_string()),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            db_timeout_secs: env::var("DB_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            issue_retry_cap: env::var("ISSUE_RETRY_CAP")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.port, 6969);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.phone_pattern, "^[6-9][0-9]{9}$");
        assert_eq!(config.token_ttl_minutes, 10);
        assert_eq!(config.issue_retry_cap, 10);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "7000");
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("REDIRECT_BASE_URL", "https://auth.example.com/");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 7000);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        // Trailing slash is trimmed so URL building stays predictable.
        assert_eq!(config.redirect_base_url, "https://auth.example.com");
    }
}
