// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Match search, event recommendations and community analysis over stored
//! volunteer profiles and events.

use crate::db::PointsStore;
use crate::error::{AppError, Result};
use crate::models::{
    CommunityDiversity, CulturalProfile, Event, EventPairings, EventRecommendation, MatchResult,
    VolunteerProfile,
};
use crate::services::similarity::{rank_matches, RankOptions};
use crate::services::{diversity, events};
use crate::time_utils::utc_day;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Ranked matches for one user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub user_id: String,
    pub profile: CulturalProfile,
    /// Profiles considered, excluding the user's own
    pub total_candidates: usize,
    pub matches: Vec<MatchResult>,
}

#[derive(Clone)]
pub struct MatchingService {
    store: Arc<dyn PointsStore>,
}

impl MatchingService {
    pub fn new(store: Arc<dyn PointsStore>) -> Self {
        Self { store }
    }

    /// Create or replace a volunteer profile.
    pub async fn upsert_profile(&self, profile: VolunteerProfile) -> Result<VolunteerProfile> {
        if profile.user_id.trim().is_empty() {
            return Err(AppError::Validation("userId is required".to_string()));
        }
        self.store.put_profile(&profile).await?;
        tracing::info!(
            user_id = %profile.user_id,
            languages = profile.languages.len(),
            events = profile.participation.len(),
            "Profile saved"
        );
        Ok(profile)
    }

    /// Cultural profile for a user, built from the stored volunteer profile.
    pub async fn cultural_profile(&self, user_id: &str) -> Result<CulturalProfile> {
        let profile = self
            .store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile not found: {}", user_id)))?;
        Ok(CulturalProfile::build(&profile))
    }

    /// Rank every other stored profile against `user_id`.
    ///
    /// A missing target profile is a `NotFound` error, never an empty list.
    pub async fn find_matches(&self, user_id: &str, options: RankOptions) -> Result<MatchReport> {
        let (target, profiles) = tokio::try_join!(
            self.store.get_profile(user_id),
            self.store.list_profiles()
        )?;
        let target = target
            .map(|p| CulturalProfile::build(&p))
            .ok_or_else(|| AppError::NotFound(format!("Profile not found: {}", user_id)))?;

        let candidates: Vec<CulturalProfile> = profiles
            .iter()
            .filter(|p| p.user_id != user_id)
            .map(CulturalProfile::build)
            .collect();

        let matches = rank_matches(&target, &candidates, options);
        tracing::debug!(
            user_id,
            candidates = candidates.len(),
            returned = matches.len(),
            cross_cultural = options.prioritize_cross_cultural,
            "Matches ranked"
        );

        Ok(MatchReport {
            user_id: user_id.to_string(),
            profile: target,
            total_candidates: candidates.len(),
            matches,
        })
    }

    pub async fn diversity(&self) -> Result<CommunityDiversity> {
        let profiles = self.store.list_profiles().await?;
        Ok(diversity::analyze(&profiles))
    }

    // ─── Events ──────────────────────────────────────────────────

    /// Create or replace an event.
    pub async fn upsert_event(&self, event: Event) -> Result<Event> {
        if event.event_id.trim().is_empty() {
            return Err(AppError::Validation("eventId is required".to_string()));
        }
        if event.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        self.store.put_event(&event).await?;
        tracing::info!(event_id = %event.event_id, date = %event.date, "Event saved");
        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>> {
        Ok(self.store.list_events().await?)
    }

    pub async fn event_recommendations(
        &self,
        user_id: &str,
        max_results: usize,
    ) -> Result<Vec<EventRecommendation>> {
        self.event_recommendations_at(user_id, max_results, utc_day(Utc::now()))
            .await
    }

    /// Upcoming events for `user_id` as of `today`.
    pub async fn event_recommendations_at(
        &self,
        user_id: &str,
        max_results: usize,
        today: NaiveDate,
    ) -> Result<Vec<EventRecommendation>> {
        let (target, all_events, community) = tokio::try_join!(
            self.store.get_profile(user_id),
            self.store.list_events(),
            self.store.list_profiles()
        )?;
        let target = target
            .map(|p| CulturalProfile::build(&p))
            .ok_or_else(|| AppError::NotFound(format!("Profile not found: {}", user_id)))?;

        let recommendations =
            events::recommend_events(&target, &all_events, &community, today, max_results);
        tracing::debug!(
            user_id,
            events = all_events.len(),
            returned = recommendations.len(),
            "Events recommended"
        );
        Ok(recommendations)
    }

    /// Volunteer/attendee pairs for a stored event.
    pub async fn event_pairings(&self, event_id: &str) -> Result<EventPairings> {
        let (event, profiles) = tokio::try_join!(
            self.store.get_event(event_id),
            self.store.list_profiles()
        )?;
        let event =
            event.ok_or_else(|| AppError::NotFound(format!("Event not found: {}", event_id)))?;

        let pairings = events::smart_pairings(&event, &profiles);
        tracing::debug!(event_id, total_pairs = pairings.total_pairs, "Event pairings built");
        Ok(pairings)
    }
}
