// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, match and diversity API tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, empty_request, json_request};

async fn put_profile(app: &axum::Router, user_id: &str, body: serde_json::Value) {
    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/api/profiles/{}", user_id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn seed(app: &axum::Router) {
    put_profile(
        app,
        "ana",
        json!({
            "name": "Ana",
            "languages": ["English", "Spanish"],
            "declaredInterests": ["music"],
            "participation": [{
                "eventId": "e1",
                "eventName": "Community Food Drive",
                "date": "2024-05-01",
                "location": "Aston",
                "role": "volunteer"
            }]
        }),
    )
    .await;
    put_profile(
        app,
        "bilal",
        json!({
            "name": "Bilal",
            "languages": ["English", "Arabic"],
            "declaredInterests": ["food", "sports"]
        }),
    )
    .await;
    put_profile(
        app,
        "carmen",
        json!({
            "name": "Carmen",
            "languages": ["Spanish", "English"],
            "declaredInterests": ["art"]
        }),
    )
    .await;
}

#[tokio::test]
async fn test_matches_ranked_and_exclude_self() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let response = app
        .oneshot(empty_request("GET", "/api/matches/ana"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["userId"], "ana");
    assert_eq!(json["totalCandidates"], 2);
    assert_eq!(json["profile"]["culturalBackground"], json!(["Hispanic/Latino"]));
    assert_eq!(json["profile"]["interests"], json!(["music", "food", "community"]));

    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m["userId2"] != "ana"));

    // Carmen shares both languages (bridge 0.7); Bilal shares food across cultures
    assert_eq!(matches[0]["userId2"], "carmen");
    assert!(matches[0]["recommendationReason"]
        .as_str()
        .unwrap()
        .starts_with("You both speak English and Spanish"));
    assert_eq!(matches[1]["userId2"], "bilal");
    assert_eq!(matches[1]["sharedInterests"], json!(["food"]));
}

#[tokio::test]
async fn test_match_limit() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let response = app
        .oneshot(empty_request("GET", "/api/matches/ana?limit=1&crossCultural=false"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["matches"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_matches_for_unknown_profile() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let response = app
        .oneshot(empty_request("GET", "/api/matches/nobody"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_community_diversity() {
    let (app, _) = create_test_app();
    seed(&app).await;

    let response = app
        .oneshot(empty_request("GET", "/api/community/diversity"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["totalUsers"], 3);
    assert_eq!(json["languagesRepresented"][0]["language"], "English");
    assert_eq!(json["languagesRepresented"][0]["count"], 3);
    assert_eq!(json["culturalGroups"][0]["group"], "Hispanic/Latino");
    assert_eq!(json["culturalGroups"][0]["count"], 2);
    // Groups 2:1 -> 1 - (4/9 + 1/9) = 0.444
    assert_eq!(json["diversityScore"], 44);
}

#[tokio::test]
async fn test_profile_with_bad_date_rejected() {
    let (app, _) = create_test_app();
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/profiles/ana",
            json!({
                "participation": [{
                    "eventId": "e1",
                    "eventName": "Food",
                    "date": "yesterday",
                    "role": "volunteer"
                }]
            }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
