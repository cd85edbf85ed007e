// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! The ledger and matching services only see [`PointsStore`]; the backend
//! (in-memory, JSON document or Firestore) is chosen at startup.

pub mod firestore;
pub mod json_file;
pub mod memory;

pub use firestore::FirestoreStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{Event, PointsAnalytics, UserPointsRecord, VolunteerProfile};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    /// Points records (keyed by user id)
    pub const USER_POINTS: &str = "user_points";
    /// Volunteer profiles (keyed by user id)
    pub const PROFILES: &str = "profiles";
    /// Community events (keyed by event id)
    pub const EVENTS: &str = "events";
    /// Single-document analytics collection
    pub const ANALYTICS: &str = "points_analytics";
    pub const ANALYTICS_DOC_ID: &str = "summary";
}

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Version conflict for {user_id}: expected {expected}, found {found}")]
    Conflict {
        user_id: String,
        expected: u64,
        found: u64,
    },

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Check an optimistic write: the stored version must be one behind the new one.
pub(crate) fn check_version(
    record: &UserPointsRecord,
    stored_version: Option<u64>,
) -> Result<(), StoreError> {
    let found = stored_version.unwrap_or(0);
    let expected = record.version.saturating_sub(1);
    if record.version == 0 || found != expected {
        return Err(StoreError::Conflict {
            user_id: record.user_id.clone(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Key-value storage for points records, analytics, profiles and events.
///
/// `put` is a compare-and-swap: the caller bumps `record.version` by one
/// from the version it read (0 for a new record) and the write is rejected
/// with [`StoreError::Conflict`] if someone else wrote in between.
#[async_trait]
pub trait PointsStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserPointsRecord>, StoreError>;

    async fn put(&self, record: &UserPointsRecord) -> Result<(), StoreError>;

    async fn get_all(&self) -> Result<Vec<UserPointsRecord>, StoreError>;

    /// Remove a record. Returns whether one existed.
    async fn delete(&self, user_id: &str) -> Result<bool, StoreError>;

    async fn get_analytics(&self) -> Result<PointsAnalytics, StoreError>;

    async fn put_analytics(&self, analytics: &PointsAnalytics) -> Result<(), StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<VolunteerProfile>, StoreError>;

    async fn put_profile(&self, profile: &VolunteerProfile) -> Result<(), StoreError>;

    async fn list_profiles(&self) -> Result<Vec<VolunteerProfile>, StoreError>;

    /// Insert or replace an event.
    async fn put_event(&self, event: &Event) -> Result<(), StoreError>;

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError>;

    /// All events, soonest first.
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;
}
