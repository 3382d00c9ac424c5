// SPDX-License-Identifier: MIT

//! Middleware modules.

pub mod security;
