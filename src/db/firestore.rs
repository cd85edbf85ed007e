// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed points store.
//!
//! Collections:
//! - `user_points/{user_id}`: points records
//! - `profiles/{user_id}`: volunteer profiles
//! - `events/{event_id}`: community events
//! - `points_analytics/summary`: the global analytics document

use crate::db::{check_version, collections, PointsStore, StoreError};
use crate::models::{Event, PointsAnalytics, UserPointsRecord, VolunteerProfile};
use async_trait::async_trait;
use futures_util::TryStreamExt;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

fn backend<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> StoreError {
    move |e| StoreError::Backend(format!("{}: {}", context, e))
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(backend("Failed to connect to Firestore"))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Emulator connection with a dummy bearer token.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJwb2ludHMifQ."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(backend("Failed to connect to Firestore Emulator"))?;

        tracing::info!(project = project_id, "Connected to Firestore (Emulator)");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Offline client: every operation fails with a backend error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client
            .as_ref()
            .ok_or_else(|| StoreError::Backend("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl PointsStore for FirestoreStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserPointsRecord>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_POINTS)
            .obj()
            .one(user_id)
            .await
            .map_err(backend("Failed to read points record"))
    }

    /// Versioned write inside a transaction.
    ///
    /// The stored version is read through the transaction, so Firestore
    /// fails our commit if another writer commits the document first. A
    /// failed commit is re-checked against the stored version and reported
    /// as a conflict when someone else won.
    async fn put(&self, record: &UserPointsRecord) -> Result<(), StoreError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(backend("Failed to begin transaction"))?;

        let stored: Option<UserPointsRecord> = client
            .clone_with_consistency_selector(firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ))
            .fluent()
            .select()
            .by_id_in(collections::USER_POINTS)
            .obj()
            .one(&record.user_id)
            .await
            .map_err(backend("Failed to read record in transaction"))?;

        if let Err(e) = check_version(record, stored.map(|r| r.version)) {
            let _ = transaction.rollback().await;
            return Err(e);
        }

        client
            .fluent()
            .update()
            .in_col(collections::USER_POINTS)
            .document_id(&record.user_id)
            .object(record)
            .add_to_transaction(&mut transaction)
            .map_err(backend("Failed to add record to transaction"))?;

        if let Err(e) = transaction.commit().await {
            tracing::warn!(user_id = %record.user_id, error = %e, "Points commit failed");
            let current = self.get(&record.user_id).await?;
            check_version(record, current.map(|r| r.version))?;
            return Err(backend("Transaction commit failed")(e));
        }

        tracing::debug!(
            user_id = %record.user_id,
            version = record.version,
            "Points record committed"
        );
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<UserPointsRecord>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_POINTS)
            .obj::<UserPointsRecord>()
            .stream_query_with_errors()
            .await
            .map_err(backend("Failed to list points records"))?
            .try_collect()
            .await
            .map_err(backend("Failed to read points record"))
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        if self.get(user_id).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USER_POINTS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(backend("Failed to delete points record"))?;

        tracing::info!(user_id, "Points record deleted");
        Ok(true)
    }

    async fn get_analytics(&self) -> Result<PointsAnalytics, StoreError> {
        let analytics: Option<PointsAnalytics> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ANALYTICS)
            .obj()
            .one(collections::ANALYTICS_DOC_ID)
            .await
            .map_err(backend("Failed to read analytics"))?;
        Ok(analytics.unwrap_or_default())
    }

    async fn put_analytics(&self, analytics: &PointsAnalytics) -> Result<(), StoreError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ANALYTICS)
            .document_id(collections::ANALYTICS_DOC_ID)
            .object(analytics)
            .execute()
            .await
            .map_err(backend("Failed to write analytics"))?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<VolunteerProfile>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(backend("Failed to read profile"))
    }

    async fn put_profile(&self, profile: &VolunteerProfile) -> Result<(), StoreError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(backend("Failed to write profile"))?;
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<VolunteerProfile>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PROFILES)
            .order_by([("userId", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(backend("Failed to list profiles"))
    }

    async fn put_event(&self, event: &Event) -> Result<(), StoreError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EVENTS)
            .document_id(&event.event_id)
            .object(event)
            .execute()
            .await
            .map_err(backend("Failed to write event"))?;
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EVENTS)
            .obj()
            .one(event_id)
            .await
            .map_err(backend("Failed to read event"))
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EVENTS)
            .obj()
            .query()
            .await
            .map_err(backend("Failed to list events"))?;
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_id.cmp(&b.event_id)));
        Ok(events)
    }
}
