use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use services::OrderingError;
use services::module_ordering::{self, CreateModule};

use crate::response::ApiResponse;
use crate::routes::courses::modules::common::{ModuleResponse, find_course};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub unlock_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub require_sequential_progress: bool,

    /// Stored as given; invalid references are ignored at evaluation time.
    #[serde(default)]
    pub prerequisite_module_ids: Vec<i64>,

    /// 1-based slot to insert at; omitted means append at the end.
    pub position: Option<u32>,
}

/// POST /api/courses/{course_id}/modules
///
/// Create a module. Admin only. The module starts `unpublished` when the
/// course is in draft mode, otherwise `active`.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Week 1",
///   "unlock_at": null,
///   "require_sequential_progress": false,
///   "prerequisite_module_ids": [],
///   "position": 1
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with the created module
/// - `400 Bad Request` on validation failure or an unusable position
/// - `404 Not Found` when the course does not exist
pub async fn create(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(req): Json<CreateModuleRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = common::format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ModuleResponse>::error(error_message)),
        );
    }

    let db = app_state.db();

    let course = match find_course(db, course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<ModuleResponse>::error("Course not found")),
            );
        }
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to load course");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleResponse>::error(
                    "An error occurred in the database",
                )),
            );
        }
    };

    let result = module_ordering::create_module(
        db,
        &course,
        CreateModule {
            name: req.name,
            unlock_at: req.unlock_at,
            require_sequential_progress: req.require_sequential_progress,
            prerequisite_module_ids: req.prerequisite_module_ids,
            position: req.position,
        },
    )
    .await;

    match result {
        Ok(module) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ModuleResponse::from_model(module, None),
                "Module created successfully",
            )),
        ),
        Err(OrderingError::InvalidPosition) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ModuleResponse>::error(
                "Position must be a positive integer",
            )),
        ),
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to create module");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleResponse>::error(
                    "Failed to create module",
                )),
            )
        }
    }
}
