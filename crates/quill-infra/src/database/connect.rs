use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn};

use quill_core::error::RepoError;

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Open the connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, RepoError> {
    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let conn = Database::connect(opts)
        .await
        .map_err(|e| RepoError::Connection(e.to_string()))?;

    tracing::info!(pool = config.max_connections, "Database connected");

    Ok(conn)
}
