// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single JSON document store.
//!
//! Layout matches the web app's `userPoints.json`:
//! `{ "users": {..}, "profiles": {..}, "events": {..}, "analytics": {..} }`.
//!
//! Every write rewrites the whole document through a temp file and rename,
//! so a crash mid-write leaves the previous document intact. A process-wide
//! mutex serializes access; the version check in `put` catches writers in
//! other processes that slipped in between.

use crate::db::{check_version, PointsStore, StoreError};
use crate::models::{Event, PointsAnalytics, UserPointsRecord, VolunteerProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PointsDocument {
    #[serde(default)]
    users: BTreeMap<String, UserPointsRecord>,
    #[serde(default)]
    profiles: BTreeMap<String, VolunteerProfile>,
    #[serde(default)]
    events: BTreeMap<String, Event>,
    #[serde(default)]
    analytics: PointsAnalytics,
}

#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<PointsDocument, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(PointsDocument::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PointsDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, doc: &PointsDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), users = doc.users.len(), "Points document saved");
        Ok(())
    }
}

#[async_trait]
impl PointsStore for JsonFileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserPointsRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        Ok(doc.users.remove(user_id))
    }

    async fn put(&self, record: &UserPointsRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        check_version(record, doc.users.get(&record.user_id).map(|r| r.version))?;
        doc.users.insert(record.user_id.clone(), record.clone());
        self.save(&doc).await
    }

    async fn get_all(&self) -> Result<Vec<UserPointsRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.users.into_values().collect())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        if doc.users.remove(user_id).is_none() {
            return Ok(false);
        }
        self.save(&doc).await?;
        Ok(true)
    }

    async fn get_analytics(&self) -> Result<PointsAnalytics, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.analytics)
    }

    async fn put_analytics(&self, analytics: &PointsAnalytics) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        doc.analytics = analytics.clone();
        self.save(&doc).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<VolunteerProfile>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        Ok(doc.profiles.remove(user_id))
    }

    async fn put_profile(&self, profile: &VolunteerProfile) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        doc.profiles.insert(profile.user_id.clone(), profile.clone());
        self.save(&doc).await
    }

    async fn list_profiles(&self) -> Result<Vec<VolunteerProfile>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.profiles.into_values().collect())
    }

    async fn put_event(&self, event: &Event) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        doc.events.insert(event.event_id.clone(), event.clone());
        self.save(&doc).await
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        Ok(doc.events.remove(event_id))
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        let mut events: Vec<Event> = doc.events.into_values().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_id.cmp(&b.event_id)));
        Ok(events)
    }
}
