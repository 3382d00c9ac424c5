// SPDX-License-Identifier: MIT

//! Credential hashing and verification.
//!
//! Stored credentials are argon2id PHC strings, salted per record.
//! Nothing reversible is kept; verification recomputes the hash and the
//! comparison inside argon2 is constant-time.

use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;

use crate::error::AppError;

/// Hash a credential string into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a credential against a stored PHC string.
///
/// An unparseable stored hash verifies as false; a broken record must
/// not open the account.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
