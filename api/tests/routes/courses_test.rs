use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::app::{make_test_app, seed_course};

#[tokio::test]
async fn create_course_requires_admin() {
    let app = make_test_app().await;

    let body = json!({"code": "COS301", "title": "Software Engineering"});

    let (status, _) = app.post("/courses", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/courses", Some(&app.student_token), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/courses", Some(&app.admin_token), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "COS301");
    assert_eq!(body["data"]["draft_mode"], false);
}

#[tokio::test]
async fn create_course_validates_code_format() {
    let app = make_test_app().await;

    let (status, body) = app
        .post(
            "/courses",
            Some(&app.admin_token),
            json!({"code": "badcode", "title": "T"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Course code must be in format ABC123");
}

#[tokio::test]
async fn create_course_rejects_duplicate_code() {
    let app = make_test_app().await;
    seed_course(&app.db, "COS301", false).await;

    let (status, body) = app
        .post(
            "/courses",
            Some(&app.admin_token),
            json!({"code": "COS301", "title": "Again"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn get_course_roundtrip_and_missing() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "MAT101", true).await;

    let (status, body) = app
        .get(&format!("/courses/{}", course.id), Some(&app.student_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "MAT101");
    assert_eq!(body["data"]["draft_mode"], true);

    let (status, body) = app.get("/courses/9999", Some(&app.student_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");
}
