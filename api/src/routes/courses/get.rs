use axum::{Json, extract::Path, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use db::models::course::{Entity as CourseEntity, Model as Course};
use sea_orm::EntityTrait;

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct CourseResponse {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub draft_mode: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            code: course.code,
            title: course.title,
            draft_mode: course.draft_mode,
            created_at: course.created_at.to_rfc3339(),
            updated_at: course.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/courses/{course_id}
///
/// Retrieve a single course.
///
/// ### Responses
/// - `200 OK` with the course
/// - `404 Not Found` when no course exists with the given id
pub async fn get_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
) -> impl IntoResponse {
    match CourseEntity::find_by_id(course_id).one(app_state.db()).await {
        Ok(Some(course)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                CourseResponse::from(course),
                "Course retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<CourseResponse>::error("Course not found")),
        ),
        Err(err) => {
            tracing::error!(error = %err, "failed to load course");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<CourseResponse>::error(
                    "An error occurred in the database",
                )),
            )
        }
    }
}
