use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use db::models::module::{Model as Module, WorkflowState};
use services::progression;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::courses::modules::common::{ModuleResponse, find_course};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListModulesQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, Default)]
pub struct ModuleListResponse {
    pub modules: Vec<ModuleResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/courses/{course_id}/modules
///
/// List the course's modules in position order, each carrying the requesting
/// user's progression (`state`, `completed_at`). Non-admin users only see
/// `active` modules.
///
/// ### Query Parameters
/// - `page` (default 1) and `per_page` (default 50, max 100)
///
/// ### Responses
/// - `200 OK` with `{modules, page, per_page, total}`
/// - `404 Not Found` when the course does not exist
pub async fn get_modules(
    State(app_state): State<AppState>,
    Path(course_id): Path<i64>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListModulesQuery>,
) -> impl IntoResponse {
    let db = app_state.db();

    match find_course(db, course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<ModuleListResponse>::error("Course not found")),
            );
        }
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to load course");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleListResponse>::error(
                    "An error occurred in the database",
                )),
            );
        }
    }

    let modules = match Module::find_ordered(db, course_id).await {
        Ok(modules) => modules,
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to load modules");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleListResponse>::error(
                    "An error occurred in the database",
                )),
            );
        }
    };

    let progressions = match progression::evaluate_course(db, course_id, claims.sub).await {
        Ok(progressions) => progressions,
        Err(err) => {
            tracing::error!(error = %err, course_id, "failed to evaluate progression");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleListResponse>::error(
                    "An error occurred in the database",
                )),
            );
        }
    };

    let visible: Vec<Module> = modules
        .into_iter()
        .filter(|m| claims.admin || m.workflow_state == WorkflowState::Active)
        .collect();

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).clamp(1, 100);
    let total = visible.len() as u64;

    let start = ((page - 1) * per_page) as usize;
    let page_modules: Vec<ModuleResponse> = visible
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .map(|m| {
            let p = progressions.get(&m.id).copied();
            ModuleResponse::from_model(m, p)
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            ModuleListResponse {
                modules: page_modules,
                page,
                per_page,
                total,
            },
            "Modules retrieved successfully",
        )),
    )
}

/// GET /api/courses/{course_id}/modules/{module_id}
///
/// Retrieve one module with the requesting user's progression. Non-admin
/// users get 404 for unpublished modules.
pub async fn get_module(
    State(app_state): State<AppState>,
    Path((course_id, module_id)): Path<(i64, i64)>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    let db = app_state.db();

    match find_course(db, course_id).await {
        Ok(Some(_)) => {}
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
    }

    let module = match Module::find_in_course(db, course_id, module_id).await {
        Ok(Some(module)) => module,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<ModuleResponse>::error("Module not found")),
            );
        }
        Err(err) => {
            tracing::error!(error = %err, module_id, "failed to load module");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleResponse>::error(
                    "An error occurred in the database",
                )),
            );
        }
    };

    if !claims.admin && module.workflow_state != WorkflowState::Active {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<ModuleResponse>::error("Module not found")),
        );
    }

    match progression::evaluate_for(db, course_id, module_id, claims.sub).await {
        Ok(p) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ModuleResponse::from_model(module, p),
                "Module retrieved successfully",
            )),
        ),
        Err(err) => {
            tracing::error!(error = %err, module_id, "failed to evaluate progression");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ModuleResponse>::error(
                    "An error occurred in the database",
                )),
            )
        }
    }
}
