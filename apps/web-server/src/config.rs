//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::SessionConfig;
use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub session: SessionConfig,
    pub template_glob: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            session: SessionConfig::from_env(),
            template_glob: env::var("TEMPLATE_GLOB")
                .unwrap_or_else(|_| "templates/**/*.html".to_string()),
        }
    }
}
