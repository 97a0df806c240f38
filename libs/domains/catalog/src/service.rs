use axum_helpers::PaginationParams;
use chrono::Utc;
use core_config::cache::CacheTtlConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::cache::{CatalogCache, keys};
use crate::category_tree;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CachedPage, CategoryOut, CategoryTopProducts, ListingPayload, ProductDetail, ProductSummary,
};
use crate::projector;
use crate::repository::CatalogRepository;

/// Cache-aside orchestration of the catalog read paths.
///
/// Each cacheable path derives a deterministic key, tries the cache, and
/// on a miss computes from the repository, projects, and writes back with
/// the path's TTL. The cache is fail-open: read and write failures degrade
/// to store computation and never surface to the caller.
#[derive(Clone)]
pub struct CatalogService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    ttls: CacheTtlConfig,
}

impl<R: CatalogRepository, C: CatalogCache> CatalogService<R, C> {
    pub fn new(repository: R, cache: C, ttls: CacheTtlConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: Arc::new(cache),
            ttls,
        }
    }

    /// Paginated active-product listing with the catalog-wide summary.
    pub async fn list_products(
        &self,
        page: &PaginationParams,
    ) -> CatalogResult<(ListingPayload, u64)> {
        page.validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let key = keys::listing(page);
        if let Some(cached) = self.cache_get::<CachedPage<ListingPayload>>(&key).await {
            return Ok((cached.data, cached.total));
        }

        let listing = self.repository.list_products(page).await?;
        let payload = ListingPayload {
            products: listing.rows.iter().map(projector::product_summary).collect(),
            summary: listing.summary,
        };

        let entry = CachedPage {
            data: payload,
            total: listing.total,
        };
        self.cache_put(&key, &entry, self.ttls.listing).await?;

        Ok((entry.data, entry.total))
    }

    /// Free-text product search.
    pub async fn search_products(
        &self,
        query: &str,
        page: &PaginationParams,
    ) -> CatalogResult<(Vec<ProductSummary>, u64)> {
        page.validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;
        if query.trim().is_empty() {
            return Err(CatalogError::Validation(
                "search query must not be empty".to_string(),
            ));
        }

        let key = keys::search(query, page);
        if let Some(cached) = self
            .cache_get::<CachedPage<Vec<ProductSummary>>>(&key)
            .await
        {
            return Ok((cached.data, cached.total));
        }

        let result = self.repository.search_products(query, page).await?;
        let summaries: Vec<ProductSummary> =
            result.rows.iter().map(projector::product_summary).collect();

        let entry = CachedPage {
            data: summaries,
            total: result.total,
        };
        self.cache_put(&key, &entry, self.ttls.search).await?;

        Ok((entry.data, entry.total))
    }

    /// Full product detail by slug.
    pub async fn product_detail(&self, slug: &str) -> CatalogResult<ProductDetail> {
        let key = keys::product_detail(slug);
        if let Some(cached) = self.cache_get::<ProductDetail>(&key).await {
            return Ok(cached);
        }

        let row = self
            .repository
            .find_product_detail(slug)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product"))?;

        let detail = projector::product_detail(&row, Utc::now());
        self.cache_put(&key, &detail, self.ttls.product_detail).await?;

        Ok(detail)
    }

    /// Category metadata (name, image, banner). Not cached.
    pub async fn category(&self, slug: &str) -> CatalogResult<CategoryOut> {
        let row = self
            .repository
            .find_category(slug)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category"))?;

        Ok(projector::category_out(&row))
    }

    /// Top-rated and top-sold products of a category's descendant closure.
    pub async fn category_top_products(&self, slug: &str) -> CatalogResult<CategoryTopProducts> {
        let key = keys::category_top(slug);
        if let Some(cached) = self.cache_get::<CategoryTopProducts>(&key).await {
            return Ok(cached);
        }

        // A missing category is NotFound, never an empty catalog.
        let category = self
            .repository
            .find_category(slug)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category"))?;

        let adjacency = self.repository.category_adjacency().await?;
        let closure = category_tree::descendants(&[category.category.id], &adjacency);

        let top = self.repository.top_products_in_categories(&closure).await?;
        let payload = CategoryTopProducts {
            top_rated: top.top_rated.iter().map(projector::product_summary).collect(),
            top_sold: top.top_sold.iter().map(projector::product_summary).collect(),
        };

        self.cache_put(&key, &payload, self.ttls.category_top).await?;

        Ok(payload)
    }

    /// Fail-open cache read: connectivity errors and undecodable entries
    /// are logged and treated as a miss.
    async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(key, "discarding undecodable cache entry: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, "cache read failed, falling back to store: {}", e);
                None
            }
        }
    }

    /// Write-back. A payload that cannot be serialized is a programming
    /// defect and fails the request; a cache write failure is only logged.
    async fn cache_put<T: Serialize>(
        &self,
        key: &str,
        payload: &T,
        ttl: Duration,
    ) -> CatalogResult<()> {
        let raw = serde_json::to_string(payload)?;
        if let Err(e) = self.cache.set_ex(key, &raw, ttl).await {
            tracing::warn!(key, "cache write failed: {}", e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCatalogCache, MockCatalogCache};
    use crate::models::{CatalogSummary, ProductListing, ProductRow};
    use crate::repository::{InMemoryCatalogRepository, MockCatalogRepository};
    use rust_decimal::Decimal;

    fn cache_error() -> redis::RedisError {
        redis::RedisError::from((redis::ErrorKind::IoError, "cache down"))
    }

    fn page(page_no: u64, size: u64) -> PaginationParams {
        PaginationParams {
            page: page_no,
            size,
        }
    }

    fn listing_fixture() -> ProductListing {
        ProductListing {
            rows: vec![ProductRow {
                name: "Linen Shirt".to_string(),
                slug: "linen-shirt".to_string(),
                public_id: "pub-1".to_string(),
                rating: Decimal::new(450, 2),
                total_sold: 7,
                stats: None,
            }],
            summary: CatalogSummary {
                total: 1,
                published: 1,
                ..Default::default()
            },
            total: 1,
        }
    }

    #[tokio::test]
    async fn listing_miss_computes_then_hit_skips_store() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_list_products()
            .times(1)
            .returning(|_| Ok(listing_fixture()));

        let service = CatalogService::new(repo, InMemoryCatalogCache::new(), CacheTtlConfig::default());

        let (first, total) = service.list_products(&page(1, 10)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(first.products[0].slug, "linen-shirt");

        // Second call must be served from cache; the mock would panic on a
        // second repository call.
        let (second, second_total) = service.list_products(&page(1, 10)).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(second_total, total);
    }

    #[tokio::test]
    async fn cached_payload_round_trips_deep_equal() {
        let repo = InMemoryCatalogRepository::new();
        seed_one_product(&repo).await;

        let service = CatalogService::new(repo, InMemoryCatalogCache::new(), CacheTtlConfig::default());

        let (fresh, _) = service.list_products(&page(1, 10)).await.unwrap();
        let (cached, _) = service.list_products(&page(1, 10)).await.unwrap();

        // Decimal and enum fields survive the text round trip unchanged.
        assert_eq!(cached, fresh);
        assert_eq!(cached.products[0].regular_price_min, Some("25.50".parse().unwrap()));
        assert_eq!(cached.products[0].discount, Some(20));
    }

    #[tokio::test]
    async fn cache_failures_fall_back_to_store() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_list_products()
            .returning(|_| Ok(listing_fixture()));

        let mut cache = MockCatalogCache::new();
        cache.expect_get().returning(|_| Err(cache_error()));
        cache.expect_set_ex().returning(|_, _, _| Err(cache_error()));

        let service = CatalogService::new(repo, cache, CacheTtlConfig::default());

        let (payload, total) = service.list_products(&page(1, 10)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(payload.products.len(), 1);
    }

    #[tokio::test]
    async fn undecodable_cache_entry_is_treated_as_miss() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_list_products()
            .returning(|_| Ok(listing_fixture()));

        let mut cache = MockCatalogCache::new();
        cache
            .expect_get()
            .returning(|_| Ok(Some("{not valid json".to_string())));
        cache.expect_set_ex().returning(|_, _, _| Ok(()));

        let service = CatalogService::new(repo, cache, CacheTtlConfig::default());
        let (payload, _) = service.list_products(&page(1, 10)).await.unwrap();
        assert_eq!(payload.products[0].slug, "linen-shirt");
    }

    #[tokio::test]
    async fn summary_is_independent_of_pagination() {
        let repo = InMemoryCatalogRepository::new();
        for i in 1..=8 {
            seed_plain_product(&repo, i).await;
        }

        let service = CatalogService::new(repo, InMemoryCatalogCache::new(), CacheTtlConfig::default());

        let (page_one, _) = service.list_products(&page(1, 5)).await.unwrap();
        let (page_two, _) = service.list_products(&page(2, 5)).await.unwrap();

        assert_eq!(page_one.products.len(), 5);
        assert_eq!(page_two.products.len(), 3);
        assert_eq!(page_one.summary, page_two.summary);
        assert_eq!(page_one.summary.total, 8);
    }

    #[tokio::test]
    async fn out_of_range_pagination_is_rejected_before_the_store() {
        // The repository mock has no expectations; reaching it would panic.
        let service = CatalogService::new(
            MockCatalogRepository::new(),
            InMemoryCatalogCache::new(),
            CacheTtlConfig::default(),
        );

        let result = service.list_products(&page(0, 10)).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));

        let result = service.list_products(&page(1, 500)).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn blank_search_query_is_rejected() {
        let service = CatalogService::new(
            MockCatalogRepository::new(),
            InMemoryCatalogCache::new(),
            CacheTtlConfig::default(),
        );

        let result = service.search_products("   ", &page(1, 10)).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_product_detail_is_not_found() {
        let service = CatalogService::new(
            InMemoryCatalogRepository::new(),
            InMemoryCatalogCache::new(),
            CacheTtlConfig::default(),
        );

        let result = service.product_detail("missing").await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_category_slug_is_not_found_not_empty() {
        let service = CatalogService::new(
            InMemoryCatalogRepository::new(),
            InMemoryCatalogCache::new(),
            CacheTtlConfig::default(),
        );

        let result = service.category_top_products("missing").await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    async fn seed_plain_product(repo: &InMemoryCatalogRepository, id: i64) {
        use crate::entity::product;
        use crate::models::{
            ExchangePolicy, ProductStatus, ProductType, ReturnPolicy, StockStatus,
        };
        use chrono::TimeZone;

        repo.insert_product(product::Model {
            id,
            public_id: format!("pub-{}", id),
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            product_no: format!("P-{:04}", id),
            description: "A product".to_string(),
            short_description: None,
            meta_description: None,
            video: None,
            delivery_time: None,
            stock_management: false,
            rating: Decimal::new(400, 2),
            total_sold: 0,
            product_type: ProductType::Simple,
            status: ProductStatus::Published,
            stock_status: StockStatus::InStock,
            return_policy: ReturnPolicy::SevenDays,
            exchange_policy: ExchangePolicy::NotExchangeable,
            brand_id: None,
            category_id: 1,
            seller_id: 1,
            is_active: true,
            created_at: chrono::Utc.timestamp_opt(id, 0).unwrap().into(),
            updated_at: chrono::Utc.timestamp_opt(id, 0).unwrap().into(),
        })
        .await;
    }

    async fn seed_one_product(repo: &InMemoryCatalogRepository) {
        use crate::entity::variant;
        use crate::models::StockStatus;
        use chrono::TimeZone;

        seed_plain_product(repo, 1).await;
        repo.insert_variant(variant::Model {
            id: 1,
            public_id: "var-1".to_string(),
            sku: Some("SKU-1".to_string()),
            description: None,
            product_id: 1,
            image_id: None,
            regular_price: "25.50".parse().unwrap(),
            discount_price: Some("20.40".parse().unwrap()),
            discount_start_date: None,
            discount_end_date: None,
            stock_status: StockStatus::InStock,
            stock: Some(10),
            low_stock_threshold: None,
            is_active: true,
            created_at: chrono::Utc.timestamp_opt(1, 0).unwrap().into(),
            updated_at: chrono::Utc.timestamp_opt(1, 0).unwrap().into(),
        })
        .await;
    }
}
