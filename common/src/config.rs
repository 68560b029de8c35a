//! Global application configuration.
//!
//! `Config` is a lazily initialized singleton populated from environment
//! variables (optionally loaded from a `.env` file). Library crates read it
//! through `Config::get()` after the binary has called `Config::init()`.

use once_cell::sync::OnceCell;
use std::{env, fs};

#[derive(Debug)]
pub struct Config {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    /// Loads configuration from the given env file (missing file is fine) and
    /// the process environment, initializing the singleton on first call.
    ///
    /// Panics if `DATABASE_URL` or `JWT_SECRET` are unset.
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/api.log".into());
            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            Config {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
                project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "courseflow".into()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
                log_file,
                log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into())
                    == "true",
                database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
                jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                    .ok()
                    .and_then(|m| m.parse().ok())
                    .unwrap_or(60),
            }
        })
    }

    /// Initializes the singleton with fixed values suitable for tests, so test
    /// binaries don't have to mutate the process environment. Safe to call more
    /// than once; later calls are no-ops.
    pub fn init_test() -> &'static Self {
        CONFIG.get_or_init(|| Config {
            env: "test".into(),
            project_name: "courseflow".into(),
            log_level: "debug".into(),
            log_file: "logs/test.log".into(),
            log_to_stdout: true,
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret-not-for-production".into(),
            jwt_duration_minutes: 60,
        })
    }

    /// Returns the initialized configuration.
    ///
    /// Panics if `init` has not been called yet.
    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}
