// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set); they are skipped otherwise.

use eightvents_points::db::{PointsStore, StoreError};
use eightvents_points::models::{Event, UserPointsRecord, VolunteerProfile};
use eightvents_points::services::{NewActivity, PointsService};
use std::sync::Arc;

mod common;
use common::{test_firestore, unique_id};

#[tokio::test]
async fn test_versioned_put_and_get() {
    require_emulator!();
    let store = test_firestore().await;
    let user_id = unique_id("fs-user");

    let mut record = UserPointsRecord::new(&user_id);
    record.version = 1;
    store.put(&record).await.expect("First write failed");

    let stored = store.get(&user_id).await.unwrap().expect("Record missing");
    assert_eq!(stored, record);

    // Writing version 1 again is stale
    let err = store.put(&record).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { found: 1, .. }));

    assert!(store.delete(&user_id).await.unwrap());
    assert!(!store.delete(&user_id).await.unwrap());
}

#[tokio::test]
async fn test_racing_stale_writers_one_wins() {
    require_emulator!();
    let store = test_firestore().await;
    let user_id = unique_id("fs-race");

    let mut base = UserPointsRecord::new(&user_id);
    base.version = 1;
    store.put(&base).await.expect("Seed write failed");

    // Both writers read version 1 and try to commit version 2
    let mut first = base.clone();
    first.version = 2;
    first.total_points = 100;
    let mut second = base.clone();
    second.version = 2;
    second.total_points = 50;

    let (a, b) = tokio::join!(store.put(&first), store.put(&second));
    let results = [a, b];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::Conflict { .. })))
        .count();
    assert_eq!(wins, 1, "Exactly one writer should commit: {:?}", results);
    assert_eq!(conflicts, 1, "The loser should see a conflict: {:?}", results);

    let stored = store.get(&user_id).await.unwrap().expect("Record missing");
    assert_eq!(stored.version, 2);
    let winner = if results[0].is_ok() { &first } else { &second };
    assert_eq!(stored.total_points, winner.total_points);
}

#[tokio::test]
async fn test_points_service_over_firestore() {
    require_emulator!();
    let store = Arc::new(test_firestore().await);
    let service = PointsService::new(store.clone(), 1.0);
    let user_id = unique_id("fs-points");

    service
        .record_activity(&user_id, NewActivity::event("e1"))
        .await
        .unwrap();
    let recorded = service
        .record_activity(&user_id, NewActivity::community_request("r1", None))
        .await
        .unwrap();

    assert_eq!(recorded.record.total_points, 150);
    assert_eq!(recorded.record.version, 2);

    let all = store.get_all().await.unwrap();
    assert!(all.iter().any(|r| r.user_id == user_id));
}

#[tokio::test]
async fn test_profiles_round_trip() {
    require_emulator!();
    let store = test_firestore().await;
    let user_id = unique_id("fs-profile");

    let profile = VolunteerProfile {
        user_id: user_id.clone(),
        name: "Test".to_string(),
        languages: vec!["Polish".to_string()],
        declared_interests: vec!["animals".to_string()],
        participation: vec![],
    };
    store.put_profile(&profile).await.unwrap();

    assert_eq!(store.get_profile(&user_id).await.unwrap(), Some(profile));
}

#[tokio::test]
async fn test_events_stored_and_fetched() {
    require_emulator!();
    let store = test_firestore().await;
    let event_id = unique_id("event");

    let event = Event {
        event_id: event_id.clone(),
        name: "River Cleanup".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2031, 3, 14).unwrap(),
        location: Some("Digbeth".to_string()),
        volunteers_needed: 12,
    };
    store.put_event(&event).await.unwrap();

    assert_eq!(store.get_event(&event_id).await.unwrap(), Some(event));
    assert!(store
        .list_events()
        .await
        .unwrap()
        .iter()
        .any(|e| e.event_id == event_id));
}
