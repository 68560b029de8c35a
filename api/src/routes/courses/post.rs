use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use validator::Validate;

use db::models::course::{Column as CourseCol, Entity as CourseEntity, Model as Course};

use crate::response::ApiResponse;
use crate::routes::courses::get::CourseResponse;
use crate::state::AppState;

lazy_static::lazy_static! {
    static ref COURSE_CODE_REGEX: regex::Regex = regex::Regex::new("^[A-Z]{3}\\d{3}$").unwrap();
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(regex(
        path = *COURSE_CODE_REGEX,
        message = "Course code must be in format ABC123"
    ))]
    pub code: String,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub draft_mode: bool,
}

/// POST /api/courses
///
/// Create a new course. Admin only.
///
/// ### Request Body
/// ```json
/// { "code": "COS301", "title": "Software Engineering", "draft_mode": false }
/// ```
///
/// ### Responses
/// - `200 OK` with the created course
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the code is already in use
pub async fn create_course(
    State(app_state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = common::format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<CourseResponse>::error(error_message)),
        );
    }

    let db = app_state.db();

    let duplicate = CourseEntity::find()
        .filter(CourseCol::Code.eq(req.code.clone()))
        .one(db)
        .await;
    if let Ok(Some(_)) = duplicate {
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::<CourseResponse>::error(
                "Course code already exists",
            )),
        );
    }

    match Course::create(db, &req.code, &req.title, req.draft_mode).await {
        Ok(course) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                CourseResponse::from(course),
                "Course created successfully",
            )),
        ),
        Err(err) => {
            tracing::error!(error = %err, "failed to create course");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<CourseResponse>::error(
                    "Failed to create course",
                )),
            )
        }
    }
}
