// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for tests and local runs.

use crate::db::{check_version, PointsStore, StoreError};
use crate::models::{Event, PointsAnalytics, UserPointsRecord, VolunteerProfile};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<String, UserPointsRecord>>,
    profiles: Arc<DashMap<String, VolunteerProfile>>,
    events: Arc<DashMap<String, Event>>,
    analytics: Arc<RwLock<PointsAnalytics>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PointsStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserPointsRecord>, StoreError> {
        Ok(self.records.get(user_id).map(|r| r.clone()))
    }

    async fn put(&self, record: &UserPointsRecord) -> Result<(), StoreError> {
        // The entry guard holds the shard lock across check and write
        let entry = self.records.entry(record.user_id.clone());
        let stored_version = match &entry {
            Entry::Occupied(e) => Some(e.get().version),
            Entry::Vacant(_) => None,
        };
        check_version(record, stored_version)?;
        entry.insert(record.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<UserPointsRecord>, StoreError> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.records.remove(user_id).is_some())
    }

    async fn get_analytics(&self) -> Result<PointsAnalytics, StoreError> {
        self.analytics
            .read()
            .map(|a| a.clone())
            .map_err(|_| StoreError::Backend("analytics lock poisoned".to_string()))
    }

    async fn put_analytics(&self, analytics: &PointsAnalytics) -> Result<(), StoreError> {
        let mut guard = self
            .analytics
            .write()
            .map_err(|_| StoreError::Backend("analytics lock poisoned".to_string()))?;
        *guard = analytics.clone();
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<VolunteerProfile>, StoreError> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn put_profile(&self, profile: &VolunteerProfile) -> Result<(), StoreError> {
        self.profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<VolunteerProfile>, StoreError> {
        let mut profiles: Vec<VolunteerProfile> =
            self.profiles.iter().map(|p| p.value().clone()).collect();
        profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(profiles)
    }

    async fn put_event(&self, event: &Event) -> Result<(), StoreError> {
        self.events.insert(event.event_id.clone(), event.clone());
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.events.get(event_id).map(|e| e.clone()))
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.events.iter().map(|e| e.value().clone()).collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_id.cmp(&b.event_id)));
        Ok(events)
    }
}
