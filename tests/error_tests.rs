// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use exercise_tracker::error::AppError;
use exercise_tracker::ExerciseTracker;

mod common;

#[test]
fn test_is_conflict_matches() {
    let err = AppError::Conflict("email runner@example.com".to_string());
    assert!(err.is_conflict());
    assert!(!err.is_invalid_input());
}

#[test]
fn test_is_conflict_no_match() {
    let err = AppError::Database("unavailable".to_string());
    assert!(!err.is_conflict());

    let err = AppError::BadRequest("Invalid limit".to_string());
    assert!(!err.is_conflict());
    assert!(err.is_invalid_input());
}

#[test]
fn test_error_messages() {
    let err = AppError::Conflict("email runner@example.com".to_string());
    assert_eq!(err.to_string(), "Already exists: email runner@example.com");

    let err = AppError::BadRequest("Invalid limit: \"ten\"".to_string());
    assert_eq!(err.to_string(), "Invalid request: Invalid limit: \"ten\"");
}

#[tokio::test]
async fn test_offline_database_errors_propagate() {
    let tracker = ExerciseTracker::new(common::test_db_offline());

    let err = tracker.list_users().await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let err = tracker
        .get_or_create_user("runner@example.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let err = tracker
        .fetch_exercise_logs(&uuid::Uuid::new_v4().to_string(), None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    // The user lookup comes before exercise validation, so even an empty
    // description reaches the database.
    let err = tracker
        .record_exercise(&uuid::Uuid::new_v4().to_string(), "", 30.0, "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_invalid_input_rejected_before_database() {
    // The offline database fails every call, so reaching it would surface
    // as a Database error instead.
    let tracker = ExerciseTracker::new(common::test_db_offline());
    let user_id = uuid::Uuid::new_v4().to_string();

    let err = tracker
        .record_exercise(&user_id, "Run", 30.0, "not a date")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = tracker
        .fetch_exercise_logs(&user_id, Some("2020-01-01"), Some("whenever"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = tracker
        .fetch_exercise_logs(&user_id, None, None, Some("-3"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
