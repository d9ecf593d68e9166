// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strety bridge: Strety todos, goals and people as callable tools.
//!
//! This crate provides the authenticated Strety client (token persistence,
//! refresh-and-retry, conditional updates, paginated collection) and a thin
//! HTTP tool channel on top of it.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod tools;

use services::StretyService;

/// Shared application state.
pub struct AppState {
    pub strety: StretyService,
}
