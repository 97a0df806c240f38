//! Cache abstraction for the catalog read paths.
//!
//! Entries are whole serialized payloads keyed per path and parameters,
//! written with a per-path TTL and never explicitly invalidated.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Async get / set-with-expiry contract the orchestrator runs against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn get(&self, key: &str) -> redis::RedisResult<Option<String>>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> redis::RedisResult<()>;
}

/// Redis-backed cache. The `ConnectionManager` multiplexes a single
/// connection and is cloned per operation, so no handle is held across
/// unrelated await points.
#[derive(Clone)]
pub struct RedisCatalogCache {
    manager: ConnectionManager,
}

impl RedisCatalogCache {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl CatalogCache for RedisCatalogCache {
    async fn get(&self, key: &str) -> redis::RedisResult<Option<String>> {
        let mut conn = self.manager.clone();
        conn.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> redis::RedisResult<()> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await
    }
}

/// In-memory cache honoring expiry, for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryCatalogCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryCatalogCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogCache for InMemoryCatalogCache {
    async fn get(&self, key: &str) -> redis::RedisResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(value, _)| value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> redis::RedisResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }
}

/// Deterministic cache keys per read path.
///
/// Free-text search input is folded into an 8-hex-char SHA-256 prefix so
/// arbitrary user input never lands in a key verbatim.
pub mod keys {
    use axum_helpers::PaginationParams;
    use sha2::{Digest, Sha256};

    pub fn listing(page: &PaginationParams) -> String {
        format!("catalog:listing:{}:{}", page.page, page.size)
    }

    pub fn search(query: &str, page: &PaginationParams) -> String {
        format!(
            "catalog:search:{}:{}:{}",
            digest8(query),
            page.page,
            page.size
        )
    }

    pub fn product_detail(slug: &str) -> String {
        format!("catalog:product:{}", slug)
    }

    pub fn category_top(slug: &str) -> String {
        format!("catalog:category-top:{}", slug)
    }

    fn digest8(input: &str) -> String {
        let digest = Sha256::digest(input.as_bytes());
        hex::encode(digest)[..8].to_string()
    }
}
