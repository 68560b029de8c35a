use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use services::OrderingError;
use services::module_ordering::{self, ModuleEvent, ModuleUpdate};

use crate::response::ApiResponse;
use crate::routes::courses::modules::common::{ModuleResponse, double_option, find_course};
use crate::state::AppState;

/// The explicit set of updatable fields; anything else in the payload is
/// rejected by serde.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditModuleRequest {
    pub name: Option<String>,

    /// Omitted → unchanged, `null` → cleared, value → replaced.
    #[serde(default, deserialize_with = "double_option")]
    pub unlock_at: Option<Option<DateTime<Utc>>>,

    pub require_sequential_progress: Option<bool>,

    pub prerequisite_module_ids: Option<Vec<i64>>,

    pub position: Option<u32>,
}

/// PUT /api/courses/{course_id}/modules/{module_id}
///
/// Edit one module. Admin only. Position changes renumber the whole course
/// sequence; prerequisite writes are permissive.
///
/// ### Responses
/// - `200 OK` with the updated module
/// - `400 Bad Request` on an unusable position or unknown field
/// - `404 Not Found` when the course or module does not exist
pub async fn edit_module(
    State(app_state): State<AppState>,
    Path((course_id, module_id)): Path<(i64, i64)>,
    Json(req): Json<EditModuleRequest>,
) -> impl IntoResponse {
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

    let result = module_ordering::update_module(
        db,
        &course,
        module_id,
        ModuleUpdate {
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
                "Module updated successfully",
            )),
        ),
        Err(OrderingError::NoModulesFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<ModuleResponse>::error("Module not found")),
        ),
        Err(OrderingError::InvalidPosition) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ModuleResponse>::error(
                "Position must be a positive integer",
            )),
        ),
        Err(err) => {
            tracing::error!(error = %err, module_id, "failed to update module");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleResponse>::error(
                    "Failed to update module",
                )),
            )
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateRequest {
    /// One of `publish`, `unpublish`, `delete`.
    pub event: String,

    #[validate(length(min = 1, message = "Request must include a non-empty list of module_ids"))]
    pub module_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Default)]
pub struct BulkUpdateResponse {
    pub completed: Vec<i64>,
}

/// PUT /api/courses/{course_id}/modules/bulk
///
/// Apply one lifecycle event to a set of modules. Admin only. Ids that do
/// not resolve to a module of this course are dropped silently; the response
/// lists the ids actually processed.
///
/// ### Request Body
/// ```json
/// { "event": "delete", "module_ids": [1, 2, 3] }
/// ```
///
/// ### Responses
/// - `200 OK` with `{"completed": [ids]}`
/// - `400 Bad Request` on an unknown event or empty id list
/// - `404 Not Found` when no id resolves to a module of this course
pub async fn bulk_edit_modules(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(req): Json<BulkUpdateRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = common::format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<BulkUpdateResponse>::error(error_message)),
        );
    }

    // Reject unknown events before any model logic runs.
    let event = match ModuleEvent::from_str(&req.event) {
        Ok(event) => event,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<BulkUpdateResponse>::error(
                    "Event must be one of publish, unpublish, or delete",
                )),
            );
        }
    };

    let db = app_state.db();

    match find_course(db, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<BulkUpdateResponse>::error("Course not found")),
            );
        }
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to load course");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<BulkUpdateResponse>::error(
                    "An error occurred in the database",
                )),
            );
        }
    }

    match module_ordering::bulk_update(db, course_id, &req.module_ids, event).await {
        Ok(completed) => {
            let message = match event {
                ModuleEvent::Publish => "Modules published successfully",
                ModuleEvent::Unpublish => "Modules unpublished successfully",
                ModuleEvent::Delete => "Modules deleted successfully",
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(BulkUpdateResponse { completed }, message)),
            )
        }
        Err(OrderingError::NoModulesFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<BulkUpdateResponse>::error(
                "No modules found for the given ids",
            )),
        ),
        Err(err) => {
            tracing::error!(error = %err, course_id, "bulk module update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<BulkUpdateResponse>::error(
                    "Failed to update modules",
                )),
            )
        }
    }
}
