// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event, event recommendation, pairing and insights API tests.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, empty_request, json_request};

fn days_from_now(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

async fn put(app: &axum::Router, uri: &str, body: serde_json::Value) -> StatusCode {
    app.clone()
        .oneshot(json_request("PUT", uri, body))
        .await
        .unwrap()
        .status()
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

/// Three profiles around a past food drive, plus upcoming events.
async fn seed(app: &axum::Router) {
    let drive = |role: &str| {
        json!([{
            "eventId": "drive",
            "eventName": "Community Food Drive",
            "date": "2024-05-01",
            "location": "Aston",
            "role": role
        }])
    };
    for (id, name, languages, role) in [
        ("vera", "Vera Diaz", json!(["Spanish", "English"]), "volunteer"),
        ("omar", "Omar", json!(["Arabic"]), "volunteer"),
        ("ana", "Ana", json!(["English", "Spanish"]), "attendee"),
    ] {
        let status = put(
            app,
            &format!("/api/profiles/{}", id),
            json!({ "name": name, "languages": languages, "participation": drive(role) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    for (id, name, days, location) in [
        ("drive", "Community Food Drive", -30, "Aston"),
        ("fair", "Food Festival", 14, "Aston"),
        ("chess", "Chess Evening", 7, "Digbeth"),
        ("picnic", "Community Picnic", 3, "Digbeth"),
    ] {
        let status = put(
            app,
            &format!("/api/events/{}", id),
            json!({ "name": name, "date": days_from_now(days), "location": location }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_events_listed_soonest_first() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let (status, json) = get(&app, "/api/events").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["eventId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["drive", "picnic", "chess", "fair"]);
}

#[tokio::test]
async fn test_event_recommendations_for_profile() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let (status, json) = get(&app, "/api/recommendations/events/ana").await;
    assert_eq!(status, StatusCode::OK);
    let recs = json.as_array().unwrap();

    // Past drive skipped; chess scores only the new-experience nudge
    let ids: Vec<&str> = recs.iter().map(|r| r["eventId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["fair", "picnic"]);

    let fair = &recs[0];
    assert_eq!(fair["matchScore"], 90);
    assert_eq!(fair["predictedSatisfaction"], 4.5);
    assert_eq!(fair["relevanceReasons"][1], "In your preferred area: Aston");
    // Volunteers from the food drive, never the requesting user
    assert_eq!(fair["compatibleUsers"], json!(["Omar (Volunteer)", "Vera (Volunteer)"]));

    assert_eq!(recs[1]["matchScore"], 60);
}

#[tokio::test]
async fn test_event_recommendations_limit_and_unknown_user() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let (status, json) = get(&app, "/api/recommendations/events/ana?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/api/recommendations/events/ana?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/recommendations/events/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pairings_for_event() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let (status, json) = get(&app, "/api/events/drive/pairings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["eventName"], "Community Food Drive");
    assert_eq!(json["totalPairs"], 2);

    let pairs = json["pairs"].as_array().unwrap();
    assert_eq!(pairs[0]["volunteer"]["name"], "Vera Diaz");
    assert_eq!(pairs[0]["attendee"]["userId"], "ana");
    assert_eq!(pairs[0]["matchScore"], 97);
    assert_eq!(pairs[1]["volunteer"]["userId"], "omar");
    assert_eq!(pairs[1]["matchScore"], 66);
}

#[tokio::test]
async fn test_pairings_unknown_event() {
    let (app, _) = create_test_app();
    let (status, json) = get(&app, "/api/events/nope/pairings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert!(json["details"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_event_validation() {
    let (app, _) = create_test_app();

    let status = put(&app, "/api/events/e1", json!({ "name": "", "date": "2030-01-01" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = put(&app, "/api/events/e1", json!({ "name": "Picnic", "date": "soon" })).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_insights_after_activity() {
    let (app, _) = create_test_app();

    let (status, _) = get(&app, "/api/points/u1/insights").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/points/interest",
            json!({
                "userId": "u1",
                "requestId": "r1",
                "requestTitle": "Help with shopping",
                "pointsEarned": 50,
                "category": "help",
                "urgency": "high"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, json) = get(&app, "/api/points/u1/insights").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userStats"]["totalPoints"], 50);
    // Community average is now 50 points per interest
    assert_eq!(json["ranking"]["percentile"], 10);
    assert_eq!(json["ranking"]["tier"], "Bronze");
    assert_eq!(json["ranking"]["pointsUntilNextTier"], 50);
    assert_eq!(json["topCategories"][0], json!({ "category": "help", "count": 1 }));
    assert_eq!(
        json["growthOpportunities"],
        json!([
            "Try food requests for new experiences",
            "Start a streak by being active daily!"
        ])
    );
    assert_eq!(json["engagementMetrics"]["consistencyScore"], 100);
}
