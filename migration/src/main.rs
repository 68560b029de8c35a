use common::config::Config;
use migration::Migrator;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

/// Standalone migration runner: `migration [up|down|fresh]`.
#[tokio::main]
async fn main() {
    let config = Config::init(".env");

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".into());
    let result = match command.as_str() {
        "up" => Migrator::up(&db, None).await,
        "down" => Migrator::down(&db, None).await,
        "fresh" => Migrator::fresh(&db).await,
        other => {
            eprintln!("Unknown command: {other} (expected up, down, or fresh)");
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("Migration failed: {err}");
        std::process::exit(1);
    }

    println!("Migration `{command}` applied successfully");
}
