// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use eightvents_points::db::StoreError;
use eightvents_points::error::AppError;
use eightvents_points::services::LedgerError;

#[test]
fn test_store_errors_map_to_retryable_statuses() {
    let conflict: AppError = StoreError::Conflict {
        user_id: "u1".to_string(),
        expected: 3,
        found: 4,
    }
    .into();
    assert!(matches!(conflict, AppError::Conflict(_)));
    assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

    let io: AppError = StoreError::Io(std::io::Error::other("disk full")).into();
    assert!(matches!(io, AppError::Persistence(_)));
    assert_eq!(io.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_ledger_errors_are_validation_errors() {
    let err: AppError = LedgerError::InvalidDonation(-1.0).into();
    assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("-1")));
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_not_found_and_internal() {
    let err = AppError::NotFound("Profile not found: x".to_string());
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let err: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}
