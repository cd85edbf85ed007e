// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 8vents points: gamification and volunteer matching backend
//!
//! This crate provides the points ledger (activities, streaks, levels),
//! interest tracking for community requests, cultural similarity
//! matching between volunteers and event recommendations, served as a
//! JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{MatchingService, PointsService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub points: PointsService,
    pub matching: MatchingService,
}
