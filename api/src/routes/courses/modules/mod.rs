//! Route group for `/api/courses/{course_id}/modules`.
//!
//! - `get.rs` — list modules (with per-user progression), fetch one module
//! - `post.rs` — create module (admin only)
//! - `put.rs` — edit one module, bulk publish/unpublish/delete (admin only)
//! - `delete.rs` — soft-delete one module (admin only)

use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};

use crate::auth::guards::allow_admin;
use crate::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use self::delete::delete_module;
use get::{get_module, get_modules};
use post::create;
use put::{bulk_edit_modules, edit_module};

pub fn modules_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_modules))
        .route("/", post(create).route_layer(from_fn(allow_admin)))
        .route("/bulk", put(bulk_edit_modules).route_layer(from_fn(allow_admin)))
        .route("/{module_id}", get(get_module))
        .route("/{module_id}", put(edit_module).route_layer(from_fn(allow_admin)))
        .route(
            "/{module_id}",
            delete(delete_module).route_layer(from_fn(allow_admin)),
        )
}
