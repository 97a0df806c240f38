use axum_helpers::server::{create_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::{CatalogService, PgCatalogRepository, RedisCatalogCache};
use tracing::info;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Store and cache come up concurrently; both retry with backoff so a
    // slow-starting container does not kill the process.
    let postgres_future = async {
        database::postgres::connect_with_retry(&config.database, None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };
    let redis_future = async {
        database::redis::connect_with_retry(&config.redis, None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };
    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    let repository = PgCatalogRepository::new(db);
    let cache = RedisCatalogCache::new(redis);
    let service = CatalogService::new(repository, cache, config.cache.clone());

    let api_routes = domain_catalog::handlers::router(service);
    let router = create_router(api_routes).merge(openapi::swagger_ui());

    info!(environment = ?config.environment, "storefront-api starting");
    create_app(router, &config.server).await?;

    Ok(())
}
