use axum::http::StatusCode;

use crate::helpers::app::make_test_app;

#[tokio::test]
async fn health_is_public_and_reports_ok() {
    let app = make_test_app().await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}
