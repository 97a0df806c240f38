use core_config::redis::RedisConfig;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::retry::{RetryConfig, retry};
use crate::{DatabaseError, DatabaseResult};

/// Connect to Redis and return a `ConnectionManager`.
///
/// The manager multiplexes one connection, reconnects automatically, and is
/// cheap to clone per operation. The connection is verified with PING
/// before being handed out.
pub async fn connect(config: &RedisConfig) -> redis::RedisResult<ConnectionManager> {
    let client = Client::open(config.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Connected to Redis");
    Ok(manager)
}

/// Connect with bounded exponential-backoff retry.
pub async fn connect_with_retry(
    config: &RedisConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<ConnectionManager> {
    let retry_config = retry_config.unwrap_or_default();
    retry(|| connect(config), &retry_config)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed {
            attempts: retry_config.max_attempts,
            details: e.to_string(),
        })
}

/// Liveness probe for readiness endpoints.
pub async fn check_health(manager: &ConnectionManager) -> DatabaseResult<()> {
    let mut conn = manager.clone();
    let _: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;
    Ok(())
}
