// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (admin access, response headers).

pub mod admin;
pub mod headers;

pub use admin::require_admin;
