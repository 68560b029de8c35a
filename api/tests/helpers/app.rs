//! Shared test harness: an in-memory app with seeded users, plus request
//! and seeding helpers used across the route tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;

use api::auth::generate_jwt;
use api::routes::routes;
use api::state::AppState;
use common::config::Config;
use db::models::{course, item_completion, module, module_item, user};
use db::test_utils::setup_test_db;
use services::module_ordering::{self, CreateModule};

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub admin_token: String,
    pub student_token: String,
    pub student_id: i64,
}

/// Fresh in-memory database with migrations applied, one admin and one
/// regular user, and a router wired to it.
pub async fn make_test_app() -> TestApp {
    Config::init_test();

    let db = setup_test_db().await;

    let admin = user::Model::create(&db, "admin", "admin@test.com", "admin_pw", true)
        .await
        .expect("create admin");
    let student = user::Model::create(&db, "student", "student@test.com", "student_pw", false)
        .await
        .expect("create student");

    let (admin_token, _) = generate_jwt(admin.id, true);
    let (student_token, _) = generate_jwt(student.id, false);

    let app = routes(AppState::new(db.clone()));

    TestApp {
        app,
        db,
        admin_token,
        student_token,
        student_id: student.id,
    }
}

/// Router over a database with no schema applied. Every query fails, which
/// lets tests pin down how handlers report storage errors. Tokens are minted
/// without users; the auth guards never touch the database.
pub async fn make_unmigrated_app() -> TestApp {
    Config::init_test();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    let (admin_token, _) = generate_jwt(1, true);
    let (student_token, _) = generate_jwt(2, false);

    let app = routes(AppState::new(db.clone()));

    TestApp {
        app,
        db,
        admin_token,
        student_token,
        student_id: 2,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        let res = self.app.clone().oneshot(req).await.expect("send request");
        let status = res.status();
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        // Rejection bodies (e.g. 422 from a failed Json extraction) are plain
        // text, so fall back to wrapping them as a string.
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}

pub async fn seed_course(
    db: &DatabaseConnection,
    code: &str,
    draft_mode: bool,
) -> course::Model {
    course::Model::create(db, code, &format!("{code} title"), draft_mode)
        .await
        .expect("seed course")
}

/// Appends a module at the end of the course sequence.
pub async fn seed_module(
    db: &DatabaseConnection,
    course: &course::Model,
    name: &str,
) -> module::Model {
    module_ordering::create_module(
        db,
        course,
        CreateModule {
            name: name.to_owned(),
            unlock_at: None,
            require_sequential_progress: false,
            prerequisite_module_ids: Vec::new(),
            position: None,
        },
    )
    .await
    .expect("seed module")
}

pub async fn seed_item(
    db: &DatabaseConnection,
    module_id: i64,
    position: i32,
    required: bool,
) -> module_item::Model {
    let now = Utc::now();
    module_item::ActiveModel {
        module_id: Set(module_id),
        title: Set(format!("Item {position}")),
        position: Set(position),
        required: Set(required),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed item")
}

pub async fn complete_item(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    at: DateTime<Utc>,
) {
    item_completion::Model::record(db, user_id, item_id, at)
        .await
        .expect("record completion");
}
