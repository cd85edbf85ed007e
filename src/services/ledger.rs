// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points ledger and streak tracking.
//!
//! Everything here is pure computation over an in-memory
//! [`UserPointsRecord`]; loading, locking and persisting the record is the
//! job of [`crate::services::PointsService`].
//!
//! Applying an activity:
//! 1. Append the entry to the activity log
//! 2. Add its points to the running total
//! 3. Advance the streak state machine (which may append a bonus entry)
//! 4. Recompute the level

use crate::models::level::level_of;
use crate::models::{
    ActivityMetadata, ActivityType, InterestedRequest, PointsActivity, UserPointsRecord,
};
use crate::time_utils::{days_between, utc_day};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const EVENT_PARTICIPATION_POINTS: u64 = 100;
pub const COMMUNITY_REQUEST_BASE_POINTS: u64 = 50;
pub const COMMUNITY_REQUEST_MAX_POINTS: u64 = 500;
pub const DEFAULT_DONATION_POINTS_PER_UNIT: f64 = 1.0;

pub const STREAK_BONUS_7_DAYS: u64 = 50;
pub const STREAK_BONUS_30_DAYS: u64 = 100;

/// Prefix of the interest tag that guards against duplicate interests.
pub const INTEREST_TAG_PREFIX: &str = "community_request:";

/// Rejected ledger input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("userId is required")]
    MissingUserId,

    #[error("requestId is required")]
    MissingRequestId,

    #[error("pointsEarned must be greater than zero")]
    MissingPoints,

    #[error("Invalid donation amount: {0}")]
    InvalidDonation(f64),

    #[error("Invalid donation rate: {0}")]
    InvalidRate(f64),

    #[error("Points total would overflow")]
    Overflow,
}

/// An activity to be appended to a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub points: u64,
    pub description: String,
    pub metadata: ActivityMetadata,
}

impl NewActivity {
    /// Participation in an event.
    pub fn event(event_id: &str) -> Self {
        Self {
            activity_type: ActivityType::Event,
            points: EVENT_PARTICIPATION_POINTS,
            description: format!("Participated in event {}", event_id),
            metadata: ActivityMetadata {
                event_id: Some(event_id.to_string()),
                ..Default::default()
            },
        }
    }

    /// Creation of a community request. Custom awards are capped.
    pub fn community_request(request_id: &str, custom_points: Option<u64>) -> Self {
        let points = custom_points
            .filter(|&p| p > 0)
            .unwrap_or(COMMUNITY_REQUEST_BASE_POINTS)
            .min(COMMUNITY_REQUEST_MAX_POINTS);

        Self {
            activity_type: ActivityType::CommunityRequest,
            points,
            description: format!("Created community request {}", request_id),
            metadata: ActivityMetadata {
                request_id: Some(request_id.to_string()),
                ..Default::default()
            },
        }
    }

    /// A donation, worth `floor(amount * rate)` points.
    pub fn donation(amount: f64, rate: f64) -> Result<Self, LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidDonation(amount));
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(LedgerError::InvalidRate(rate));
        }

        let raw = (amount * rate).floor();
        if raw >= u64::MAX as f64 {
            return Err(LedgerError::Overflow);
        }

        Ok(Self {
            activity_type: ActivityType::Donation,
            points: raw as u64,
            description: format!("Donated £{}", amount),
            metadata: ActivityMetadata {
                donation_amount: Some(amount),
                ..Default::default()
            },
        })
    }
}

// ─── Streak Tracking ─────────────────────────────────────────

/// How a new activity day relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
    /// No previous activity; streak starts at 1
    FirstActivity,
    /// Already active today (or the clock went backwards); nothing changes
    SameDay,
    /// Active yesterday; streak grows by one
    Continued,
    /// Gap of more than one day; streak restarts at 1
    Broken,
}

/// Result of a streak update.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakUpdate {
    pub transition: StreakTransition,
    /// Bonus entry appended when the streak hit 7 or 30 days
    pub bonus: Option<PointsActivity>,
}

/// Advance the streak state machine for an activity at `now`.
///
/// A 7-day or 30-day bonus is appended to the activity log (and counted in
/// the total) when a continued streak lands exactly on that length.
pub fn update_streak(record: &mut UserPointsRecord, now: DateTime<Utc>) -> StreakUpdate {
    let today = utc_day(now);

    let (transition, bonus) = match record.last_activity_date {
        None => {
            record.current_streak = 1;
            (StreakTransition::FirstActivity, None)
        }
        Some(last) => match days_between(last, today) {
            diff if diff <= 0 => (StreakTransition::SameDay, None),
            1 => {
                record.current_streak += 1;
                let bonus = streak_bonus(record.current_streak, now);
                if let Some(bonus) = &bonus {
                    record.activities.push(bonus.clone());
                    record.total_points += bonus.points;
                }
                (StreakTransition::Continued, bonus)
            }
            _ => {
                record.current_streak = 1;
                (StreakTransition::Broken, None)
            }
        },
    };

    record.best_streak = record.best_streak.max(record.current_streak);
    // Never move the date backwards on a skewed clock
    if record.last_activity_date.map_or(true, |last| last < today) {
        record.last_activity_date = Some(today);
    }

    StreakUpdate { transition, bonus }
}

fn streak_bonus(streak: u32, now: DateTime<Utc>) -> Option<PointsActivity> {
    let (points, description) = match streak {
        7 => (STREAK_BONUS_7_DAYS, "7-day streak bonus! 🔥"),
        30 => (STREAK_BONUS_30_DAYS, "30-day streak bonus! 🏆"),
        _ => return None,
    };

    Some(PointsActivity {
        activity_type: ActivityType::StreakBonus,
        points,
        timestamp: now,
        description: description.to_string(),
        metadata: ActivityMetadata {
            streak_days: Some(streak),
            ..Default::default()
        },
    })
}

// ─── Activity Recording ──────────────────────────────────────

/// What a successful `apply_activity` changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedActivity {
    pub activity: PointsActivity,
    pub streak: StreakUpdate,
    pub level_before: u8,
}

impl AppliedActivity {
    /// Points added by this call, streak bonus included.
    pub fn points_awarded(&self) -> u64 {
        self.activity.points + self.streak.bonus.as_ref().map_or(0, |b| b.points)
    }
}

/// Append an activity, update the streak and recompute the level.
pub fn apply_activity(
    record: &mut UserPointsRecord,
    new: NewActivity,
    now: DateTime<Utc>,
) -> Result<AppliedActivity, LedgerError> {
    if record.user_id.trim().is_empty() {
        return Err(LedgerError::MissingUserId);
    }
    // Leave room for the largest bonus so the update cannot fail half-way
    record
        .total_points
        .checked_add(new.points)
        .and_then(|t| t.checked_add(STREAK_BONUS_30_DAYS))
        .ok_or(LedgerError::Overflow)?;

    let level_before = record.level;
    let activity = PointsActivity {
        activity_type: new.activity_type,
        points: new.points,
        timestamp: now,
        description: new.description,
        metadata: new.metadata,
    };

    record.activities.push(activity.clone());
    record.total_points += activity.points;
    let streak = update_streak(record, now);
    record.level = level_of(record.total_points);

    Ok(AppliedActivity {
        activity,
        streak,
        level_before,
    })
}

// ─── Community Request Interest ──────────────────────────────

/// Interest in a community request.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestInput {
    pub request_id: String,
    pub request_title: String,
    pub points_earned: u64,
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub location: Option<String>,
}

/// Result of recording an interest.
#[derive(Debug, Clone, PartialEq)]
pub enum InterestOutcome {
    Recorded(AppliedActivity),
    /// The user already showed interest in this request; nothing changed
    AlreadyInterested,
}

/// Tag stored in `interests` for a community request.
pub fn interest_tag(request_id: &str) -> String {
    format!("{}{}", INTEREST_TAG_PREFIX, request_id)
}

/// Record interest in a community request, at most once per request.
///
/// Unlike the other activity types this one is idempotent: a repeat for the
/// same request returns [`InterestOutcome::AlreadyInterested`].
pub fn record_interest(
    record: &mut UserPointsRecord,
    input: InterestInput,
    now: DateTime<Utc>,
) -> Result<InterestOutcome, LedgerError> {
    if input.request_id.trim().is_empty() {
        return Err(LedgerError::MissingRequestId);
    }
    if input.points_earned == 0 {
        return Err(LedgerError::MissingPoints);
    }

    let tag = interest_tag(&input.request_id);
    if record.interests.contains(&tag) {
        return Ok(InterestOutcome::AlreadyInterested);
    }

    let new = NewActivity {
        activity_type: ActivityType::CommunityRequest,
        points: input.points_earned,
        description: format!("Interested in: {}", input.request_title),
        metadata: ActivityMetadata {
            request_id: Some(input.request_id.clone()),
            category: input.category.clone(),
            urgency: input.urgency.clone(),
            location: input.location.clone(),
            ..Default::default()
        },
    };
    let applied = apply_activity(record, new, now)?;

    record.interests.push(tag);
    record.interested_requests.push(InterestedRequest {
        request_id: input.request_id,
        timestamp: now,
        points_earned: input.points_earned,
    });

    if let Some(counter) = input
        .category
        .as_deref()
        .and_then(|c| record.category_preferences.get_mut(c))
    {
        *counter += 1;
    }
    if let Some(counter) = input
        .urgency
        .as_deref()
        .and_then(|u| record.urgency_response.get_mut(u))
    {
        *counter += 1;
    }
    if let Some(location) = input.location.filter(|l| !l.is_empty()) {
        if !record.location_preferences.contains(&location) {
            record.location_preferences.push(location);
        }
    }

    Ok(InterestOutcome::Recorded(applied))
}

// ─── Queries ─────────────────────────────────────────────────

/// The last `limit` activities, newest first.
pub fn recent_activities(record: &UserPointsRecord, limit: usize) -> Vec<PointsActivity> {
    record.activities.iter().rev().take(limit).cloned().collect()
}

/// Points earned per activity type (every type present, possibly zero).
pub fn points_breakdown(record: &UserPointsRecord) -> BTreeMap<ActivityType, u64> {
    let mut breakdown: BTreeMap<ActivityType, u64> =
        ActivityType::ALL.iter().map(|&t| (t, 0)).collect();
    for activity in &record.activities {
        *breakdown.entry(activity.activity_type).or_insert(0) += activity.points;
    }
    breakdown
}

/// Points from activities in the 7 days before `now`.
pub fn weekly_points(record: &UserPointsRecord, now: DateTime<Utc>) -> u64 {
    let week_ago = now - Duration::days(7);
    record
        .activities
        .iter()
        .filter(|a| a.timestamp > week_ago)
        .map(|a| a.points)
        .sum()
}

/// Top `limit` records by total points.
pub fn leaderboard(mut records: Vec<UserPointsRecord>, limit: usize) -> Vec<UserPointsRecord> {
    records.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    records.truncate(limit);
    records
}

/// Engagement bucket derived from the current streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    High,
    Medium,
    Low,
}

impl EngagementLevel {
    pub fn from_streak(streak: u32) -> Self {
        match streak {
            s if s >= 7 => EngagementLevel::High,
            s if s >= 3 => EngagementLevel::Medium,
            _ => EngagementLevel::Low,
        }
    }
}

/// Request suggestions derived from a user's interest history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct InterestRecommendations {
    pub preferred_categories: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub urgency_preference: String,
    pub recommendation_score: f64,
    pub engagement_level: EngagementLevel,
}

pub fn interest_recommendations(record: &UserPointsRecord) -> InterestRecommendations {
    let mut categories: Vec<(&String, &u32)> = record.category_preferences.iter().collect();
    categories.sort_by(|a, b| b.1.cmp(a.1));
    let preferred_categories = categories
        .into_iter()
        .take(3)
        .map(|(c, _)| c.clone())
        .collect();

    let skip = record.location_preferences.len().saturating_sub(5);
    let preferred_locations = record.location_preferences[skip..].to_vec();

    let urgency_preference = record
        .urgency_response
        .iter()
        .filter(|(_, &count)| count > 0)
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(u, _)| u.clone())
        .unwrap_or_else(|| "medium".to_string());

    let interests = record.interested_requests.len().max(1);

    InterestRecommendations {
        preferred_categories,
        preferred_locations,
        urgency_preference,
        recommendation_score: record.total_points as f64 / interests as f64,
        engagement_level: EngagementLevel::from_streak(record.current_streak),
    }
}
