// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.
//!
//! Every response, success or failure, is the same JSON envelope:
//! `{success, message?, data?, errorCode?}`. Each error variant maps to
//! a fixed HTTP status and a stable `errorCode` string so integrating
//! platforms can branch on codes rather than messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Username is neither a valid email nor a valid phone number")]
    InvalidUsername,

    /// Platform registration collisions answer 400 with a pointer back to
    /// the existing account.
    #[error("The provided email is already registered with the platform, please log in to your current account.")]
    DuplicateClientEmail,

    #[error("The provided phone number is already registered with the platform, please log in to your current account.")]
    DuplicateClientPhone,

    /// User registration collisions answer 409.
    #[error("A user with this email is already registered")]
    DuplicateUserEmail,

    #[error("A user with this phone number is already registered")]
    DuplicateUserPhone,

    /// Sign-in rejects an unknown API key with 403.
    #[error("API key not recognized")]
    InvalidApiKey,

    /// Token verification rejects an unknown API key with 401.
    #[error("API key not recognized")]
    UnknownApiKey,

    #[error("No user found for the given username")]
    UserNotFound,

    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("No client registered under this API key")]
    ClientNotFound,

    #[error("Token not recognized")]
    TokenNotFound,

    #[error("Session token has expired")]
    TokenExpired,

    #[error("Could not allocate a unique session token")]
    TokenIssuanceFailed,

    #[error("Identifier space exhausted for {0}")]
    ResourceExhausted(&'static str),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status and stable `errorCode` for this error.
    pub fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            AppError::MissingParam(_) => (StatusCode::BAD_REQUEST, "MISSING_PARAM"),
            AppError::InvalidEmail => (StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
            AppError::InvalidPhone => (StatusCode::BAD_REQUEST, "INVALID_PHONE"),
            AppError::InvalidUsername => (StatusCode::BAD_REQUEST, "INVALID_USERNAME_FORMAT"),
            AppError::DuplicateClientEmail => (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL"),
            AppError::DuplicateClientPhone => (StatusCode::BAD_REQUEST, "DUPLICATE_PHONE"),
            AppError::DuplicateUserEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
            AppError::DuplicateUserPhone => (StatusCode::CONFLICT, "DUPLICATE_PHONE"),
            AppError::InvalidApiKey => (StatusCode::FORBIDDEN, "INVALID_API_KEY"),
            AppError::UnknownApiKey => (StatusCode::UNAUTHORIZED, "INVALID_API_KEY"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::ClientNotFound => (StatusCode::NOT_FOUND, "CLIENT_NOT_FOUND"),
            AppError::TokenNotFound => (StatusCode::NOT_FOUND, "TOKEN_NOT_FOUND"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AppError::TokenIssuanceFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TOKEN_ISSUANCE_FAILED")
            }
            AppError::ResourceExhausted(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "RESOURCE_EXHAUSTED")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// JSON envelope shared by every response.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(rename = "errorCode", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error_code: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error_code: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.parts();

        // Storage and internal failures keep their detail in the logs;
        // callers only see a generic message.
        let message = match &self {
            AppError::Database(detail) => {
                tracing::error!(error = %detail, "Database error");
                "Internal server error".to_string()
            }
            AppError::Unavailable(detail) => {
                tracing::error!(error = %detail, "Database unavailable");
                "Service temporarily unavailable".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Envelope::<()> {
            success: false,
            message: Some(message),
            data: None,
            error_code: Some(error_code),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
