use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use services::OrderingError;
use services::module_ordering;

use crate::response::ApiResponse;
use crate::routes::courses::modules::common::find_course;
use crate::state::AppState;

/// DELETE /api/courses/{course_id}/modules/{module_id}
///
/// Soft-delete one module and compact the remaining sequence. Admin only.
/// The module row is kept with `workflow_state = deleted`; it drops out of
/// position sequencing and prerequisite evaluation.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found` when the course or module does not exist
pub async fn delete_module(
    State(app_state): State<AppState>,
    Path((course_id, module_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let db = app_state.db();

    match find_course(db, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Course not found")),
            );
        }
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to load course");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    "An error occurred in the database",
                )),
            );
        }
    }

    match module_ordering::soft_delete(db, course_id, module_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Module deleted successfully")),
        ),
        Err(OrderingError::NoModulesFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Module not found")),
        ),
        Err(err) => {
            tracing::error!(error = %err, module_id, "failed to delete module");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to delete module")),
            )
        }
    }
}
