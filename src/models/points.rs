// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points ledger records.
//!
//! Field names are camelCase so the stored JSON document keeps the shape
//! the web frontend already reads (`userPoints.json`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Category keys tracked for community-request interests.
pub const REQUEST_CATEGORIES: [&str; 5] = ["help", "food", "items", "skills", "other"];

/// Urgency keys tracked for community-request interests.
pub const URGENCY_LEVELS: [&str; 3] = ["high", "medium", "low"];

/// Kind of point-earning activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Event,
    Donation,
    CommunityRequest,
    StreakBonus,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Event,
        ActivityType::Donation,
        ActivityType::CommunityRequest,
        ActivityType::StreakBonus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Event => "event",
            ActivityType::Donation => "donation",
            ActivityType::CommunityRequest => "community_request",
            ActivityType::StreakBonus => "streak_bonus",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional context attached to an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One entry of the append-only activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PointsActivity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub metadata: ActivityMetadata,
}

/// A request the user has expressed interest in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct InterestedRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_earned: u64,
}

/// Per-user points, streak and preference state.
///
/// Invariants kept by the ledger:
/// - `total_points` equals the sum of `activities[*].points`
/// - `best_streak >= current_streak`
/// - `level == level_of(total_points)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserPointsRecord {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
    /// Interest tags, e.g. `community_request:42`
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub interested_requests: Vec<InterestedRequest>,
    #[serde(default)]
    pub activities: Vec<PointsActivity>,
    #[serde(default = "default_category_counters")]
    pub category_preferences: BTreeMap<String, u32>,
    #[serde(default = "default_urgency_counters")]
    pub urgency_response: BTreeMap<String, u32>,
    #[serde(default)]
    pub location_preferences: Vec<String>,
    /// Optimistic concurrency version, bumped on every successful write
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub version: u64,
}

impl UserPointsRecord {
    /// Empty record for a user seen for the first time.
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            name: format!("User {}", user_id),
            user_id,
            total_points: 0,
            current_streak: 0,
            best_streak: 0,
            level: 0,
            last_activity_date: None,
            interests: Vec::new(),
            interested_requests: Vec::new(),
            activities: Vec::new(),
            category_preferences: default_category_counters(),
            urgency_response: default_urgency_counters(),
            location_preferences: Vec::new(),
            version: 0,
        }
    }

    /// Sum of points over the activity log.
    pub fn activity_points(&self) -> u64 {
        self.activities.iter().map(|a| a.points).sum()
    }
}

fn default_category_counters() -> BTreeMap<String, u32> {
    REQUEST_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), 0))
        .collect()
}

fn default_urgency_counters() -> BTreeMap<String, u32> {
    URGENCY_LEVELS.iter().map(|u| (u.to_string(), 0)).collect()
}

/// Platform-wide interest analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PointsAnalytics {
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points_awarded: u64,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_interests: u64,
    #[serde(default = "default_popular_category")]
    pub most_popular_category: String,
    #[serde(default)]
    pub average_points_per_interest: f64,
    #[serde(default = "default_category_counters")]
    pub category_distribution: BTreeMap<String, u32>,
    #[serde(default = "default_urgency_counters")]
    pub urgency_distribution: BTreeMap<String, u32>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

fn default_popular_category() -> String {
    "help".to_string()
}

impl Default for PointsAnalytics {
    fn default() -> Self {
        Self {
            total_points_awarded: 0,
            total_interests: 0,
            most_popular_category: default_popular_category(),
            average_points_per_interest: 0.0,
            category_distribution: default_category_counters(),
            urgency_distribution: default_urgency_counters(),
            last_updated: None,
        }
    }
}

impl PointsAnalytics {
    /// Fold one recorded interest into the aggregates.
    pub fn record_interest(
        &mut self,
        points: u64,
        category: Option<&str>,
        urgency: Option<&str>,
        now: DateTime<Utc>,
    ) {
        self.total_points_awarded += points;
        self.total_interests += 1;
        self.average_points_per_interest =
            self.total_points_awarded as f64 / self.total_interests as f64;

        if let Some(counter) = category.and_then(|c| self.category_distribution.get_mut(c)) {
            *counter += 1;
        }
        if let Some(counter) = urgency.and_then(|u| self.urgency_distribution.get_mut(u)) {
            *counter += 1;
        }

        // Strictly greater wins, so ties keep the earlier category in key order
        let mut max_count = 0;
        let mut popular = default_popular_category();
        for (category, &count) in &self.category_distribution {
            if count > max_count {
                max_count = count;
                popular = category.clone();
            }
        }
        self.most_popular_category = popular;
        self.last_updated = Some(now);
    }
}
