use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::app::{make_test_app, make_unmigrated_app, seed_course, seed_module};

#[tokio::test]
async fn create_module_appends_and_starts_active() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, body) = app
        .post(&uri, Some(&app.admin_token), json!({"name": "Week 1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Module created successfully");
    assert_eq!(body["data"]["position"], 1);
    assert_eq!(body["data"]["workflow_state"], "active");

    let (_, body) = app
        .post(&uri, Some(&app.admin_token), json!({"name": "Week 2"}))
        .await;
    assert_eq!(body["data"]["position"], 2);
}

#[tokio::test]
async fn create_module_in_draft_course_starts_unpublished() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", true).await;

    let (status, body) = app
        .post(
            &format!("/courses/{}/modules", course.id),
            Some(&app.admin_token),
            json!({"name": "Week 1"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["workflow_state"], "unpublished");
}

#[tokio::test]
async fn create_module_with_position_renumbers_sequence() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    seed_module(&app.db, &course, "First").await;
    seed_module(&app.db, &course, "Second").await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, body) = app
        .post(
            &uri,
            Some(&app.admin_token),
            json!({"name": "Inserted", "position": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["position"], 1);

    let (_, body) = app.get(&uri, Some(&app.admin_token)).await;
    let names: Vec<&str> = body["data"]["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .map(|m| m["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Inserted", "First", "Second"]);
    let positions: Vec<i64> = body["data"]["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .map(|m| m["position"].as_i64().expect("position"))
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[tokio::test]
async fn create_module_rejects_position_zero() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;

    let (status, body) = app
        .post(
            &format!("/courses/{}/modules", course.id),
            Some(&app.admin_token),
            json!({"name": "Bad", "position": 0}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Position must be a positive integer");
}

#[tokio::test]
async fn create_module_requires_admin() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, _) = app
        .post(&uri, Some(&app.student_token), json!({"name": "Nope"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post(&uri, None, json!({"name": "Nope"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn storage_failure_is_a_500_not_a_missing_course() {
    let app = make_unmigrated_app().await;

    let (status, body) = app.get("/courses/1/modules", Some(&app.admin_token)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An error occurred in the database");
}

#[tokio::test]
async fn list_modules_requires_authentication() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;

    let (status, _) = app
        .get(&format!("/courses/{}/modules", course.id), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_only_see_active_modules() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    seed_module(&app.db, &course, "Visible").await;
    let hidden = seed_module(&app.db, &course, "Hidden").await;
    let uri = format!("/courses/{}/modules", course.id);

    app.put(
        &format!("{uri}/bulk"),
        Some(&app.admin_token),
        json!({"event": "unpublish", "module_ids": [hidden.id]}),
    )
    .await;

    let (_, body) = app.get(&uri, Some(&app.student_token)).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["modules"][0]["name"], "Visible");

    let (_, body) = app.get(&uri, Some(&app.admin_token)).await;
    assert_eq!(body["data"]["total"], 2);

    // A single unpublished module is a 404 for students, not a leak.
    let (status, _) = app
        .get(&format!("{uri}/{}", hidden.id), Some(&app.student_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .get(&format!("{uri}/{}", hidden.id), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn list_modules_paginates() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    for i in 1..=5 {
        seed_module(&app.db, &course, &format!("Week {i}")).await;
    }

    let (_, body) = app
        .get(
            &format!("/courses/{}/modules?page=2&per_page=2", course.id),
            Some(&app.admin_token),
        )
        .await;

    assert_eq!(body["data"]["page"], 2);
    assert_eq!(body["data"]["per_page"], 2);
    assert_eq!(body["data"]["total"], 5);
    let names: Vec<&str> = body["data"]["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .map(|m| m["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Week 3", "Week 4"]);
}

#[tokio::test]
async fn edit_module_updates_fields_and_moves_position() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    seed_module(&app.db, &course, "First").await;
    let second = seed_module(&app.db, &course, "Second").await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, body) = app
        .put(
            &format!("{uri}/{}", second.id),
            Some(&app.admin_token),
            json!({"name": "Renamed", "position": 1}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Module updated successfully");
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["position"], 1);

    let (_, body) = app.get(&uri, Some(&app.admin_token)).await;
    let names: Vec<&str> = body["data"]["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .map(|m| m["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Renamed", "First"]);
}

#[tokio::test]
async fn rejected_edit_leaves_the_module_unchanged() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let module = seed_module(&app.db, &course, "Original").await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, body) = app
        .put(
            &format!("{uri}/{}", module.id),
            Some(&app.admin_token),
            json!({"name": "Renamed", "position": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Position must be a positive integer");

    let (_, body) = app
        .get(&format!("{uri}/{}", module.id), Some(&app.admin_token))
        .await;
    assert_eq!(body["data"]["name"], "Original");
    assert_eq!(body["data"]["position"], 1);
}

#[tokio::test]
async fn edit_module_can_clear_unlock_at() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let module = seed_module(&app.db, &course, "Week 1").await;
    let uri = format!("/courses/{}/modules/{}", course.id, module.id);

    let (_, body) = app
        .put(
            &uri,
            Some(&app.admin_token),
            json!({"unlock_at": "2030-01-01T00:00:00Z"}),
        )
        .await;
    assert!(body["data"]["unlock_at"].is_string());

    // Explicit null clears the timestamp; omitting the field leaves it alone.
    let (_, body) = app
        .put(&uri, Some(&app.admin_token), json!({"name": "Still locked"}))
        .await;
    assert!(body["data"]["unlock_at"].is_string());

    let (_, body) = app
        .put(&uri, Some(&app.admin_token), json!({"unlock_at": null}))
        .await;
    assert!(body["data"]["unlock_at"].is_null());
}

#[tokio::test]
async fn edit_module_rejects_unknown_fields() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let module = seed_module(&app.db, &course, "Week 1").await;

    let (status, _) = app
        .put(
            &format!("/courses/{}/modules/{}", course.id, module.id),
            Some(&app.admin_token),
            json!({"workflow_state": "deleted"}),
        )
        .await;

    // Lifecycle changes must go through /bulk; the edit whitelist rejects them.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn edit_module_missing_module_is_404() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;

    let (status, body) = app
        .put(
            &format!("/courses/{}/modules/9999", course.id),
            Some(&app.admin_token),
            json!({"name": "Ghost"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Module not found");
}

#[tokio::test]
async fn delete_module_soft_deletes_and_renumbers() {
    let app = make_test_app().await;
    let course = seed_course(&app.db, "COS301", false).await;
    let first = seed_module(&app.db, &course, "First").await;
    seed_module(&app.db, &course, "Second").await;
    let uri = format!("/courses/{}/modules", course.id);

    let (status, body) = app
        .delete(&format!("{uri}/{}", first.id), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Module deleted successfully");

    let (status, _) = app
        .get(&format!("{uri}/{}", first.id), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&uri, Some(&app.admin_token)).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["modules"][0]["name"], "Second");
    assert_eq!(body["data"]["modules"][0]["position"], 1);

    // Deleting again is a 404: deleted modules are gone for every caller.
    let (status, _) = app
        .delete(&format!("{uri}/{}", first.id), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
