//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → login (public)
//! - `/courses` → course and module management (authenticated; mutations
//!   additionally gated by `allow_admin` inside the group)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::allow_authenticated;
use crate::routes::{auth::auth_routes, courses::course_routes, health::health_routes};
use crate::state::AppState;

pub mod auth;
pub mod courses;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/courses",
            course_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
