//! Route group for `/api/courses`.
//!
//! - `post.rs` — create course (admin only)
//! - `get.rs` — fetch one course
//! - `modules/` — nested module routes under `/{course_id}/modules`

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

use crate::auth::guards::allow_admin;
use crate::state::AppState;

pub mod get;
pub mod modules;
pub mod post;

use get::get_course;
use modules::modules_routes;
use post::create_course;

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).route_layer(from_fn(allow_admin)))
        .route("/{course_id}", get(get_course))
        .nest("/{course_id}/modules", modules_routes())
}
