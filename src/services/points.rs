// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points service: the ledger over a shared store.
//!
//! Every read-modify-write of a user's record runs under that user's
//! mutex, so concurrent requests for one user are applied in turn and
//! none is lost. The store's version check catches writers in other
//! processes. The mutated record is only returned once the store accepted
//! it; on any error the caller sees the error and nothing is committed.

use crate::db::PointsStore;
use crate::error::{AppError, Result};
use crate::models::level::{level_info, LevelInfo};
use crate::models::{ActivityMetadata, ActivityType, PointsActivity, PointsAnalytics, UserPointsRecord};
use crate::services::insights::{self, UserInsights};
use crate::services::ledger::{
    self, AppliedActivity, InterestInput, InterestOutcome, InterestRecommendations, LedgerError,
    NewActivity,
};
use crate::time_utils::utc_day;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Default number of entries for leaderboard and recent-activity queries.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Shared per-user locks type for use in AppState.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// A committed ledger update.
#[derive(Debug, Clone)]
pub struct RecordedActivity {
    pub applied: AppliedActivity,
    pub record: UserPointsRecord,
}

/// Result of recording interest in a community request.
#[derive(Debug, Clone)]
pub struct InterestResult {
    pub outcome: InterestOutcome,
    /// The user's record after the call (unchanged for a duplicate)
    pub record: UserPointsRecord,
}

/// Everything the points dashboard shows for one user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PointsSummary {
    pub user_id: String,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub level: LevelInfo,
    pub current_streak: u32,
    pub best_streak: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub weekly_points: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub breakdown: BTreeMap<ActivityType, u64>,
    pub recent_activities: Vec<PointsActivity>,
}

#[derive(Clone)]
pub struct PointsService {
    store: Arc<dyn PointsStore>,
    user_locks: UserLocks,
    /// Serializes read-modify-write of the global analytics document
    analytics_lock: Arc<Mutex<()>>,
    donation_rate: f64,
}

impl PointsService {
    pub fn new(store: Arc<dyn PointsStore>, donation_rate: f64) -> Self {
        Self {
            store,
            user_locks: Arc::new(DashMap::new()),
            analytics_lock: Arc::new(Mutex::new(())),
            donation_rate,
        }
    }

    pub fn store(&self) -> &Arc<dyn PointsStore> {
        &self.store
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Current record, or a fresh one for a user seen for the first time.
    async fn load_or_new(&self, user_id: &str) -> Result<UserPointsRecord> {
        Ok(self
            .store
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserPointsRecord::new(user_id)))
    }

    /// Persist a mutated record as the next version.
    async fn commit(&self, mut record: UserPointsRecord) -> Result<UserPointsRecord> {
        record.version += 1;
        if let Err(e) = self.store.put(&record).await {
            tracing::error!(user_id = %record.user_id, error = %e, "Failed to persist points record");
            return Err(e.into());
        }
        Ok(record)
    }

    // ─── Ledger Updates ──────────────────────────────────────────

    /// Append an activity for `user_id` at the current time.
    pub async fn record_activity(
        &self,
        user_id: &str,
        activity: NewActivity,
    ) -> Result<RecordedActivity> {
        self.record_activity_at(user_id, activity, Utc::now()).await
    }

    /// Append an activity for `user_id` as if it happened at `now`.
    pub async fn record_activity_at(
        &self,
        user_id: &str,
        activity: NewActivity,
        now: DateTime<Utc>,
    ) -> Result<RecordedActivity> {
        if user_id.trim().is_empty() {
            return Err(LedgerError::MissingUserId.into());
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut record = self.load_or_new(user_id).await?;
        let applied = ledger::apply_activity(&mut record, activity, now)?;
        let record = self.commit(record).await?;

        tracing::info!(
            user_id,
            activity_type = %applied.activity.activity_type,
            points = applied.points_awarded(),
            total_points = record.total_points,
            streak = record.current_streak,
            level = record.level,
            "Activity recorded"
        );
        if record.level > applied.level_before {
            tracing::info!(user_id, level = record.level, "Level up");
        }

        Ok(RecordedActivity { applied, record })
    }

    /// Generic entry point: an activity of any type with explicit points.
    pub async fn award(
        &self,
        user_id: &str,
        activity_type: ActivityType,
        points: u64,
        description: Option<String>,
        metadata: ActivityMetadata,
    ) -> Result<RecordedActivity> {
        let description =
            description.unwrap_or_else(|| format!("{} (+{} points)", activity_type, points));
        let activity = NewActivity {
            activity_type,
            points,
            description,
            metadata,
        };
        self.record_activity(user_id, activity).await
    }

    pub async fn award_event(&self, user_id: &str, event_id: &str) -> Result<RecordedActivity> {
        if event_id.trim().is_empty() {
            return Err(AppError::Validation("eventId is required".to_string()));
        }
        self.record_activity(user_id, NewActivity::event(event_id))
            .await
    }

    /// Award points for a donation at the configured rate.
    pub async fn award_donation(&self, user_id: &str, amount: f64) -> Result<RecordedActivity> {
        let activity = NewActivity::donation(amount, self.donation_rate)?;
        self.record_activity(user_id, activity).await
    }

    pub async fn award_community_request(
        &self,
        user_id: &str,
        request_id: &str,
        custom_points: Option<u64>,
    ) -> Result<RecordedActivity> {
        if request_id.trim().is_empty() {
            return Err(LedgerError::MissingRequestId.into());
        }
        self.record_activity(
            user_id,
            NewActivity::community_request(request_id, custom_points),
        )
        .await
    }

    /// Record interest in a community request, at most once per request.
    pub async fn record_interest(
        &self,
        user_id: &str,
        input: InterestInput,
    ) -> Result<InterestResult> {
        self.record_interest_at(user_id, input, Utc::now()).await
    }

    pub async fn record_interest_at(
        &self,
        user_id: &str,
        input: InterestInput,
        now: DateTime<Utc>,
    ) -> Result<InterestResult> {
        if user_id.trim().is_empty() {
            return Err(LedgerError::MissingUserId.into());
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut record = self.load_or_new(user_id).await?;
        let request_id = input.request_id.clone();
        let category = input.category.clone();
        let urgency = input.urgency.clone();

        let outcome = ledger::record_interest(&mut record, input, now)?;
        let points = match &outcome {
            InterestOutcome::AlreadyInterested => {
                tracing::debug!(user_id, request_id = %request_id, "Interest already recorded");
                return Ok(InterestResult { outcome, record });
            }
            InterestOutcome::Recorded(applied) => applied.activity.points,
        };

        let record = self.commit(record).await?;
        tracing::info!(
            user_id,
            request_id = %request_id,
            points,
            total_points = record.total_points,
            "Interest recorded"
        );

        // The user's record is already committed; an analytics failure is
        // logged rather than reported as a failed interest.
        if let Err(e) = self
            .update_analytics(points, category.as_deref(), urgency.as_deref(), now)
            .await
        {
            tracing::error!(user_id, error = %e, "Failed to update points analytics");
        }

        Ok(InterestResult { outcome, record })
    }

    async fn update_analytics(
        &self,
        points: u64,
        category: Option<&str>,
        urgency: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let _guard = self.analytics_lock.lock().await;
        let mut analytics = self.store.get_analytics().await?;
        analytics.record_interest(points, category, urgency, now);
        self.store.put_analytics(&analytics).await?;
        Ok(())
    }

    /// Admin reset: remove a user's record entirely.
    ///
    /// Unknown users are rejected before a lock is created for them, so
    /// resets of arbitrary ids leave no entries behind.
    pub async fn reset_user(&self, user_id: &str) -> Result<()> {
        if self.store.get(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("No points for user {}", user_id)));
        }

        let lock = self.user_lock(user_id);
        let deleted = {
            let _guard = lock.lock().await;
            self.store.delete(user_id).await?
        };
        drop(lock);
        // Nobody else holds the lock: forget it along with the record
        self.user_locks
            .remove_if(user_id, |_, l| Arc::strong_count(l) == 1);

        if !deleted {
            return Err(AppError::NotFound(format!("No points for user {}", user_id)));
        }
        tracing::info!(user_id, "Points record reset");
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────

    pub async fn get_record(&self, user_id: &str) -> Result<UserPointsRecord> {
        self.store
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No points for user {}", user_id)))
    }

    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<UserPointsRecord>> {
        let records = self.store.get_all().await?;
        Ok(ledger::leaderboard(records, limit))
    }

    pub async fn summary(&self, user_id: &str, recent: usize) -> Result<PointsSummary> {
        let record = self.get_record(user_id).await?;
        Ok(summarize(&record, recent, Utc::now()))
    }

    pub async fn interest_recommendations(
        &self,
        user_id: &str,
    ) -> Result<InterestRecommendations> {
        let record = self.get_record(user_id).await?;
        Ok(ledger::interest_recommendations(&record))
    }

    pub async fn analytics(&self) -> Result<PointsAnalytics> {
        Ok(self.store.get_analytics().await?)
    }

    /// Ranking, growth suggestions and engagement metrics for one user.
    pub async fn insights(&self, user_id: &str) -> Result<UserInsights> {
        let (record, analytics) = tokio::try_join!(self.get_record(user_id), self.analytics())?;
        Ok(insights::user_insights(
            &record,
            &analytics,
            utc_day(Utc::now()),
        ))
    }
}

/// Build the dashboard summary for a record as of `now`.
pub fn summarize(record: &UserPointsRecord, recent: usize, now: DateTime<Utc>) -> PointsSummary {
    PointsSummary {
        user_id: record.user_id.clone(),
        name: record.name.clone(),
        total_points: record.total_points,
        level: level_info(record.level),
        current_streak: record.current_streak,
        best_streak: record.best_streak,
        weekly_points: ledger::weekly_points(record, now),
        breakdown: ledger::points_breakdown(record),
        recent_activities: ledger::recent_activities(record, recent),
    }
}
