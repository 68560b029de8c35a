use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::response::ApiResponse;
use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /api/health
async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({"status": "ok"}), "Healthy"))
}
