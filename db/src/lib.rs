pub mod models;
pub mod test_utils;

use common::config::Config;
use sea_orm::{Database, DatabaseConnection};

/// Connects to the configured database.
///
/// Panics if the connection cannot be established; callers run at process
/// startup where there is nothing sensible to recover to.
pub async fn connect() -> DatabaseConnection {
    Database::connect(&Config::get().database_url)
        .await
        .expect("Failed to connect to database")
}
