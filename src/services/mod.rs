// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod issuer;
pub mod password;
pub mod validation;

pub use issuer::IssueError;
pub use validation::{UsernameKind, ValidationRules};
