use crate::{ConfigError, FromEnv, env_parse_or};
use std::time::Duration;

/// Per-path cache TTLs for the catalog read endpoints.
///
/// Writes do not evict cache entries; these TTLs are the staleness bound
/// for each read path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheTtlConfig {
    pub listing: Duration,
    pub search: Duration,
    pub product_detail: Duration,
    pub category_top: Duration,
}

impl FromEnv for CacheTtlConfig {
    /// All values optional, in seconds:
    /// CACHE_TTL_LISTING, CACHE_TTL_SEARCH, CACHE_TTL_PRODUCT, CACHE_TTL_CATEGORY_TOP
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            listing: Duration::from_secs(env_parse_or("CACHE_TTL_LISTING", 300)?),
            search: Duration::from_secs(env_parse_or("CACHE_TTL_SEARCH", 600)?),
            product_detail: Duration::from_secs(env_parse_or("CACHE_TTL_PRODUCT", 3600)?),
            category_top: Duration::from_secs(env_parse_or("CACHE_TTL_CATEGORY_TOP", 1800)?),
        })
    }
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            listing: Duration::from_secs(300),
            search: Duration::from_secs(600),
            product_detail: Duration::from_secs(3600),
            category_top: Duration::from_secs(1800),
        }
    }
}
