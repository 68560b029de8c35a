use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use crate::helpers::app::{
    complete_item, make_test_app, seed_course, seed_item, seed_module,
};

#[tokio::test]
async fn modules_default_to_unlocked() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    seed_module(&app.db, &course, "Week 1").await;

    let (_, body) = app
        .get(
            &format!("/courses/{}/modules", course.id),
            Some(&app.student_token),
        )
        .await;

    assert_eq!(body["data"]["modules"][0]["state"], "unlocked");
    assert!(body["data"]["modules"][0]["completed_at"].is_null());
}

#[tokio::test]
async fn future_unlock_at_locks_a_module() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let module = seed_module(&app.db, &course, "Week 1").await;
    let uri = format!("/courses/{}/modules", course.id);

    app.put(
        &format!("{uri}/{}", module.id),
        Some(&app.admin_token),
        json!({"unlock_at": "2099-01-01T00:00:00Z"}),
    )
    .await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "locked");

    app.put(
        &format!("{uri}/{}", module.id),
        Some(&app.admin_token),
        json!({"unlock_at": "2001-01-01T00:00:00Z"}),
    )
    .await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "unlocked");
}

#[tokio::test]
async fn completing_required_items_completes_the_module() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let module = seed_module(&app.db, &course, "Week 1").await;
    let required = seed_item(&app.db, module.id, 1, true).await;
    let optional = seed_item(&app.db, module.id, 2, false).await;
    let uri = format!("/courses/{}/modules", course.id);

    // Only the optional item done: started, not completed.
    complete_item(&app.db, app.student_id, optional.id, Utc::now()).await;
    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "started");

    complete_item(&app.db, app.student_id, required.id, Utc::now()).await;
    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "completed");
    assert!(body["data"]["modules"][0]["completed_at"].is_string());
}

#[tokio::test]
async fn progression_is_per_user() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let module = seed_module(&app.db, &course, "Week 1").await;
    let item = seed_item(&app.db, module.id, 1, true).await;
    let uri = format!("/courses/{}/modules", course.id);

    complete_item(&app.db, app.student_id, item.id, Utc::now()).await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "completed");

    // The admin has no completions, so the same module is merely unlocked.
    let (_, body) = app.get(&uri, Some(&app.admin_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "unlocked");
}

#[tokio::test]
async fn incomplete_prerequisite_locks_the_dependent_module() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let first = seed_module(&app.db, &course, "Week 1").await;
    let second = seed_module(&app.db, &course, "Week 2").await;
    let gate = seed_item(&app.db, first.id, 1, true).await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, _) = app
        .put(
            &format!("{uri}/{}", second.id),
            Some(&app.admin_token),
            json!({"prerequisite_module_ids": [first.id]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][1]["state"], "locked");

    complete_item(&app.db, app.student_id, gate.id, Utc::now()).await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "completed");
    assert_eq!(body["data"]["modules"][1]["state"], "unlocked");
}

#[tokio::test]
async fn prerequisite_chain_stays_locked_until_the_head_is_done() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let a = seed_module(&app.db, &course, "A").await;
    let b = seed_module(&app.db, &course, "B").await;
    let c = seed_module(&app.db, &course, "C").await;
    seed_item(&app.db, a.id, 1, true).await;
    seed_item(&app.db, b.id, 1, true).await;
    let uri = format!("/courses/{}/modules", course.id);

    app.put(
        &format!("{uri}/{}", b.id),
        Some(&app.admin_token),
        json!({"prerequisite_module_ids": [a.id]}),
    )
    .await;
    app.put(
        &format!("{uri}/{}", c.id),
        Some(&app.admin_token),
        json!({"prerequisite_module_ids": [b.id]}),
    )
    .await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    let states: Vec<&str> = body["data"]["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .map(|m| m["state"].as_str().expect("state"))
        .collect();
    assert_eq!(states, vec!["unlocked", "locked", "locked"]);
}

#[tokio::test]
async fn deleted_prerequisites_stop_gating() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let first = seed_module(&app.db, &course, "Week 1").await;
    let second = seed_module(&app.db, &course, "Week 2").await;
    seed_item(&app.db, first.id, 1, true).await;
    let uri = format!("/courses/{}/modules", course.id);

    app.put(
        &format!("{uri}/{}", second.id),
        Some(&app.admin_token),
        json!({"prerequisite_module_ids": [first.id]}),
    )
    .await;
    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][1]["state"], "locked");

    app.delete(&format!("{uri}/{}", first.id), Some(&app.admin_token))
        .await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["modules"][0]["state"], "unlocked");
}
