use core_config::postgres::PostgresConfig;
use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

use crate::retry::{RetryConfig, retry};
use crate::{DatabaseError, DatabaseResult};

/// Connect to PostgreSQL with the pool settings from `PostgresConfig`.
pub async fn connect(config: &PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.pool_size)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(config.pool_ttl_secs))
        .max_lifetime(Duration::from_secs(config.pool_ttl_secs))
        .test_before_acquire(config.pre_ping)
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(options).await?;

    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect with bounded exponential-backoff retry; use at startup where
/// the database container may not be up yet.
pub async fn connect_with_retry(
    config: &PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    let retry_config = retry_config.unwrap_or_default();
    retry(|| connect(config), &retry_config)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed {
            attempts: retry_config.max_attempts,
            details: e.to_string(),
        })
}

/// Liveness probe for readiness endpoints.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))
}
