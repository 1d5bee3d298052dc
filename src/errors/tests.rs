use super::*;
use axum::body::to_bytes;
use axum::response::IntoResponse;

/// Helper to extract status code and body JSON from an ApiError response
async fn error_response(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_database_error_masks_the_cause() {
    let error = ApiError::Database(anyhow::anyhow!("connection refused"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_not_found_names_the_resource() {
    let (status, body) = error_response(ApiError::NotFound("Flashcard")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Flashcard not found");

    let (_, body) = error_response(ApiError::NotFound("Timetable entry")).await;
    assert_eq!(body["error"], "Timetable entry not found");
}

#[tokio::test]
async fn test_subject_empty_is_not_found() {
    let (status, body) = error_response(ApiError::SubjectEmpty("physics".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No topics found for subject: physics");
}

#[tokio::test]
async fn test_unauthorized_response() {
    let msg = "Invalid email or password".to_string();
    let error = ApiError::Unauthorized(msg.clone());
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], msg);
}

#[tokio::test]
async fn test_conflict_response() {
    let msg = "Email already registered".to_string();
    let error = ApiError::Conflict(msg.clone());
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], msg);
}

#[tokio::test]
async fn test_validation_response() {
    let msg = "Exam type must be 'mains' or 'advanced'".to_string();
    let error = ApiError::Validation(msg.clone());
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], msg);
}
