// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points, streak and interest routes.

use crate::error::Result;
use crate::middleware::require_admin;
use crate::models::{ActivityMetadata, ActivityType, PointsActivity, PointsAnalytics, UserPointsRecord};
use crate::services::ledger::InterestRecommendations;
use crate::services::points::DEFAULT_LIST_LIMIT;
use crate::services::{
    InterestInput, InterestOutcome, PointsSummary, RecordedActivity, UserInsights,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Points routes. The admin check on reset needs the state up front.
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/points/leaderboard", get(get_leaderboard))
        .route("/api/points/analytics", get(get_analytics))
        .route("/api/points/interest", post(record_interest))
        .route(
            "/api/points/recommendations/{user_id}",
            get(get_recommendations),
        )
        .route(
            "/api/points/{user_id}",
            get(get_points).merge(
                delete(reset_points)
                    .route_layer(middleware::from_fn_with_state(state, require_admin)),
            ),
        )
        .route("/api/points/{user_id}/summary", get(get_summary))
        .route("/api/points/{user_id}/insights", get(get_insights))
        .route("/api/points/{user_id}/activities", post(record_activity))
        .route("/api/points/{user_id}/events", post(award_event))
        .route("/api/points/{user_id}/donations", post(award_donation))
        .route("/api/points/{user_id}/requests", post(award_request))
}

// ─── Activity Awards ─────────────────────────────────────────

/// Response for any successful points award.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points_earned: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub level: u8,
    pub level_up: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Bonus appended by this award, if the streak hit 7 or 30 days
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub streak_bonus: Option<u64>,
    pub activity: PointsActivity,
}

impl From<RecordedActivity> for ActivityResponse {
    fn from(recorded: RecordedActivity) -> Self {
        let RecordedActivity { applied, record } = recorded;
        Self {
            success: true,
            points_earned: applied.points_awarded(),
            total_points: record.total_points,
            level: record.level,
            level_up: record.level > applied.level_before,
            current_streak: record.current_streak,
            best_streak: record.best_streak,
            streak_bonus: applied.streak.bonus.as_ref().map(|b| b.points),
            activity: applied.activity,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub points: u64,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: ActivityMetadata,
}

/// Record an activity of any type with explicit points.
async fn record_activity(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>> {
    payload.validate()?;
    let recorded = state
        .points
        .award(
            &user_id,
            payload.activity_type,
            payload.points,
            payload.description,
            payload.metadata,
        )
        .await?;
    Ok(Json(recorded.into()))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventAwardRequest {
    #[validate(length(min = 1, max = 200))]
    pub event_id: String,
}

async fn award_event(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<EventAwardRequest>,
) -> Result<Json<ActivityResponse>> {
    payload.validate()?;
    let recorded = state.points.award_event(&user_id, &payload.event_id).await?;
    Ok(Json(recorded.into()))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonationAwardRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

async fn award_donation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<DonationAwardRequest>,
) -> Result<Json<ActivityResponse>> {
    payload.validate()?;
    let recorded = state.points.award_donation(&user_id, payload.amount).await?;
    Ok(Json(recorded.into()))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestAwardRequest {
    #[validate(length(min = 1, max = 200))]
    pub request_id: String,
    /// Custom award; capped, and 0 falls back to the base award
    pub points: Option<u64>,
}

async fn award_request(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<RequestAwardRequest>,
) -> Result<Json<ActivityResponse>> {
    payload.validate()?;
    let recorded = state
        .points
        .award_community_request(&user_id, &payload.request_id, payload.points)
        .await?;
    Ok(Json(recorded.into()))
}

// ─── Community Request Interest ──────────────────────────────

/// Interest payload. Missing fields default to empty so they are reported
/// as validation errors rather than body rejections.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterestRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "userId is required"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "requestId is required"))]
    pub request_id: String,
    #[serde(default)]
    pub request_title: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "pointsEarned is required"))]
    pub points_earned: u64,
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct InterestResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_interested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub points_earned: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub level: u8,
    pub current_streak: u32,
}

/// Record interest in a community request (once per request).
async fn record_interest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InterestRequest>,
) -> Result<Json<InterestResponse>> {
    payload.validate()?;

    let input = InterestInput {
        request_id: payload.request_id,
        request_title: payload.request_title,
        points_earned: payload.points_earned,
        category: payload.category,
        urgency: payload.urgency,
        location: payload.location,
    };
    let result = state.points.record_interest(&payload.user_id, input).await?;
    let record = &result.record;

    let response = match &result.outcome {
        InterestOutcome::AlreadyInterested => InterestResponse {
            success: false,
            message: "User already showed interest in this request".to_string(),
            already_interested: Some(true),
            points_earned: None,
            total_points: record.total_points,
            level: record.level,
            current_streak: record.current_streak,
        },
        InterestOutcome::Recorded(applied) => InterestResponse {
            success: true,
            message: "Interest recorded successfully".to_string(),
            already_interested: None,
            points_earned: Some(applied.activity.points),
            total_points: record.total_points,
            level: record.level,
            current_streak: record.current_streak,
        },
    };

    Ok(Json(response))
}

// ─── Queries ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LeaderboardQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// Leaderboard row.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub level: u8,
    pub current_streak: u32,
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    params.validate()?;
    let records = state
        .points
        .leaderboard(params.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;

    let entries = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| LeaderboardEntry {
            rank: i + 1,
            user_id: r.user_id,
            name: r.name,
            total_points: r.total_points,
            level: r.level,
            current_streak: r.current_streak,
        })
        .collect();
    Ok(Json(entries))
}

async fn get_analytics(State(state): State<Arc<AppState>>) -> Result<Json<PointsAnalytics>> {
    Ok(Json(state.points.analytics().await?))
}

async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<InterestRecommendations>> {
    Ok(Json(state.points.interest_recommendations(&user_id).await?))
}

async fn get_points(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPointsRecord>> {
    Ok(Json(state.points.get_record(&user_id).await?))
}

#[derive(Deserialize, Validate)]
pub struct SummaryQuery {
    #[validate(range(max = 100))]
    pub recent: Option<usize>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<PointsSummary>> {
    params.validate()?;
    let summary = state
        .points
        .summary(&user_id, params.recent.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;
    Ok(Json(summary))
}

async fn get_insights(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserInsights>> {
    Ok(Json(state.points.insights(&user_id).await?))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// Admin reset of a user's points.
async fn reset_points(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ResetResponse>> {
    state.points.reset_user(&user_id).await?;
    Ok(Json(ResetResponse {
        success: true,
        message: format!("Points reset for user {}", user_id),
    }))
}
