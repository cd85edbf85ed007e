// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community events and the recommendations built around them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A scheduled community event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub volunteers_needed: u32,
}

/// An upcoming event suggested to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct EventRecommendation {
    pub event_id: String,
    pub event_name: String,
    pub date: NaiveDate,
    pub match_score: u32,
    pub relevance_reasons: Vec<String>,
    /// Volunteers who took part in similar events
    pub compatible_users: Vec<String>,
    /// Expected rating out of 5
    pub predicted_satisfaction: f64,
}

/// One side of an event pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PairedUser {
    pub user_id: String,
    pub name: String,
}

/// A volunteer paired with an attendee of the same event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct EventPairing {
    pub volunteer: PairedUser,
    pub attendee: PairedUser,
    /// Similarity scaled to 0-100
    pub match_score: u32,
    pub reason: String,
}

/// Ranked pairings for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct EventPairings {
    pub event_id: String,
    pub event_name: String,
    /// Pairs considered before truncation
    pub total_pairs: usize,
    pub pairs: Vec<EventPairing>,
}
