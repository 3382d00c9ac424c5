// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod client;
pub mod token;
pub mod user;

pub use client::{Client, ClientLogEntry};
pub use token::{SessionToken, TokenState};
pub use user::{User, UserLogEntry};
