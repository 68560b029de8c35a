//! Application state shared across Axum route handlers.

use sea_orm::DatabaseConnection;

/// Central application state. Cheap to clone; the SeaORM connection is an
/// internally pooled handle.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
