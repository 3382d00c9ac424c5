// SPDX-License-Identifier: MIT

//! Email and phone validation shared by registration and sign-in.

use regex::Regex;
use validator::ValidateEmail;

use crate::error::AppError;

/// Compiled validation rules.
///
/// The phone pattern comes from configuration; the default is a
/// 10-digit number with a leading 6-9.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    phone: Regex,
}

/// How a sign-in username was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameKind {
    Email,
    Phone,
}

impl ValidationRules {
    pub fn new(phone_pattern: &str) -> Result<Self, AppError> {
        let phone = Regex::new(phone_pattern).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Invalid phone pattern {:?}: {}",
                phone_pattern,
                e
            ))
        })?;
        Ok(Self { phone })
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        email.validate_email()
    }

    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone.is_match(phone)
    }

    /// Classify a sign-in username with the same rules registration
    /// applies. Email wins when a value could match both.
    pub fn classify_username(&self, username: &str) -> Result<UsernameKind, AppError> {
        if self.is_valid_email(username) {
            Ok(UsernameKind::Email)
        } else if self.is_valid_phone(username) {
            Ok(UsernameKind::Phone)
        } else {
            Err(AppError::InvalidUsername)
        }
    }
}
