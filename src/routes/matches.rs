// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer profile, match, event and community diversity routes.

use crate::error::Result;
use crate::models::{
    CommunityDiversity, Event, EventPairings, EventRecommendation, ParticipationRecord,
    VolunteerProfile,
};
use crate::services::events::DEFAULT_MAX_EVENT_RECOMMENDATIONS;
use crate::services::similarity::DEFAULT_MAX_RESULTS;
use crate::services::{MatchReport, RankOptions};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profiles/{user_id}", put(upsert_profile))
        .route("/api/matches/{user_id}", get(get_matches))
        .route("/api/community/diversity", get(get_diversity))
        .route("/api/events", get(list_events))
        .route("/api/events/{event_id}", put(upsert_event))
        .route("/api/events/{event_id}/pairings", get(get_pairings))
        .route(
            "/api/recommendations/events/{user_id}",
            get(get_event_recommendations),
        )
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub languages: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub declared_interests: Vec<String>,
    #[serde(default)]
    pub participation: Vec<ParticipationRecord>,
}

/// Create or replace the volunteer profile that matches are built from.
async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<VolunteerProfile>> {
    payload.validate()?;
    let profile = VolunteerProfile {
        user_id,
        name: payload.name,
        languages: payload.languages,
        declared_interests: payload.declared_interests,
        participation: payload.participation,
    };
    Ok(Json(state.matching.upsert_profile(profile).await?))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
    /// Rank by bridge potential too (default true)
    pub cross_cultural: Option<bool>,
}

async fn get_matches(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<MatchReport>> {
    params.validate()?;
    let options = RankOptions {
        max_results: params.limit.unwrap_or(DEFAULT_MAX_RESULTS),
        prioritize_cross_cultural: params.cross_cultural.unwrap_or(true),
    };
    Ok(Json(state.matching.find_matches(&user_id, options).await?))
}

async fn get_diversity(State(state): State<Arc<AppState>>) -> Result<Json<CommunityDiversity>> {
    Ok(Json(state.matching.diversity().await?))
}

// ─── Events ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[serde(default)]
    pub volunteers_needed: u32,
}

async fn upsert_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<EventRequest>,
) -> Result<Json<Event>> {
    payload.validate()?;
    let event = Event {
        event_id,
        name: payload.name,
        date: payload.date,
        location: payload.location,
        volunteers_needed: payload.volunteers_needed,
    };
    Ok(Json(state.matching.upsert_event(event).await?))
}

async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.matching.list_events().await?))
}

async fn get_pairings(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventPairings>> {
    Ok(Json(state.matching.event_pairings(&event_id).await?))
}

#[derive(Deserialize, Validate)]
pub struct EventRecommendationQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

async fn get_event_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<EventRecommendationQuery>,
) -> Result<Json<Vec<EventRecommendation>>> {
    params.validate()?;
    let limit = params.limit.unwrap_or(DEFAULT_MAX_EVENT_RECOMMENDATIONS);
    Ok(Json(
        state.matching.event_recommendations(&user_id, limit).await?,
    ))
}
