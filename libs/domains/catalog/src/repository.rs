use async_trait::async_trait;
use axum_helpers::PaginationParams;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::entity::{attribute, attribute_variant, brand, category, media, product, tag, variant};
use crate::error::CatalogResult;
use crate::models::{
    AttributeDetailRow, CatalogSummary, CategoryNode, CategoryRow, ProductDetailRow,
    ProductListing, ProductRow, ProductStatus, SearchPage, StockStatus, TopProducts,
    VariantDetailRow, VariantPrice,
};
use crate::pricing;

/// Query contract for the catalog read paths.
///
/// Every operation filters `is_active` transitively through each join;
/// inactive rows never appear, not even nested under an active parent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Active products, most recently updated first, with the
    /// pagination-independent status/stock summary.
    async fn list_products(&self, page: &PaginationParams) -> CatalogResult<ProductListing>;

    /// Active, published products matching the pattern on name, slug,
    /// product number, brand name, category name, or tag name
    /// (case-insensitive substring, OR semantics), ordered by name.
    async fn search_products(
        &self,
        query: &str,
        page: &PaginationParams,
    ) -> CatalogResult<SearchPage>;

    /// Single active, published product by slug with variants, images,
    /// brand, category, and the attributes its variants use.
    async fn find_product_detail(&self, slug: &str) -> CatalogResult<Option<ProductDetailRow>>;

    /// Active category by slug with its image and banner media.
    async fn find_category(&self, slug: &str) -> CatalogResult<Option<CategoryRow>>;

    /// All active categories as `(id, parent_id)` pairs.
    async fn category_adjacency(&self) -> CatalogResult<Vec<CategoryNode>>;

    /// Top-5-by-rating and top-5-by-sold slices over the active, published
    /// products of the given categories.
    async fn top_products_in_categories(
        &self,
        category_ids: &HashSet<i64>,
    ) -> CatalogResult<TopProducts>;
}

#[derive(Debug, Default)]
struct CatalogStore {
    products: Vec<product::Model>,
    variants: Vec<variant::Model>,
    categories: Vec<category::Model>,
    brands: Vec<brand::Model>,
    tags: Vec<tag::Model>,
    attributes: Vec<attribute::Model>,
    attribute_variants: Vec<attribute_variant::Model>,
    media: Vec<media::Model>,
    /// (product_id, tag_id)
    product_tags: Vec<(i64, i64)>,
    /// (product_id, image_id, priority)
    product_images: Vec<(i64, i64, i32)>,
    /// (variant_id, attribute_variant_id)
    variant_attribute_variants: Vec<(i64, i64)>,
}

/// In-memory implementation of [`CatalogRepository`] for tests and local
/// development. Mirrors the Postgres implementation's semantics over plain
/// collections.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    store: RwLock<CatalogStore>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_product(&self, model: product::Model) {
        self.store.write().await.products.push(model);
    }

    pub async fn insert_variant(&self, model: variant::Model) {
        self.store.write().await.variants.push(model);
    }

    pub async fn insert_category(&self, model: category::Model) {
        self.store.write().await.categories.push(model);
    }

    pub async fn insert_brand(&self, model: brand::Model) {
        self.store.write().await.brands.push(model);
    }

    pub async fn insert_tag(&self, model: tag::Model) {
        self.store.write().await.tags.push(model);
    }

    pub async fn insert_attribute(&self, model: attribute::Model) {
        self.store.write().await.attributes.push(model);
    }

    pub async fn insert_attribute_variant(&self, model: attribute_variant::Model) {
        self.store.write().await.attribute_variants.push(model);
    }

    pub async fn insert_media(&self, model: media::Model) {
        self.store.write().await.media.push(model);
    }

    pub async fn link_tag(&self, product_id: i64, tag_id: i64) {
        self.store.write().await.product_tags.push((product_id, tag_id));
    }

    pub async fn link_image(&self, product_id: i64, image_id: i64, priority: i32) {
        self.store
            .write()
            .await
            .product_images
            .push((product_id, image_id, priority));
    }

    pub async fn link_attribute_variant(&self, variant_id: i64, attribute_variant_id: i64) {
        self.store
            .write()
            .await
            .variant_attribute_variants
            .push((variant_id, attribute_variant_id));
    }
}

impl CatalogStore {
    fn product_row(&self, product: &product::Model) -> ProductRow {
        let prices: Vec<VariantPrice> = self
            .variants
            .iter()
            .filter(|v| v.product_id == product.id && v.is_active)
            .map(|v| VariantPrice::new(v.regular_price, v.discount_price))
            .collect();

        ProductRow {
            name: product.name.clone(),
            slug: product.slug.clone(),
            public_id: product.public_id.clone(),
            rating: product.rating,
            total_sold: product.total_sold,
            stats: pricing::variant_price_stats(&prices),
        }
    }

    fn active_media(&self, id: i64) -> Option<&media::Model> {
        self.media.iter().find(|m| m.id == id && m.is_active)
    }

    fn matches_search(&self, product: &product::Model, pattern: &str) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(pattern);

        if contains(&product.name) || contains(&product.slug) || contains(&product.product_no) {
            return true;
        }

        if let Some(brand_id) = product.brand_id
            && self
                .brands
                .iter()
                .any(|b| b.id == brand_id && b.is_active && contains(&b.name))
        {
            return true;
        }

        if self
            .categories
            .iter()
            .any(|c| c.id == product.category_id && c.is_active && contains(&c.name))
        {
            return true;
        }

        self.product_tags.iter().any(|&(product_id, tag_id)| {
            product_id == product.id
                && self
                    .tags
                    .iter()
                    .any(|t| t.id == tag_id && t.is_active && contains(&t.name))
        })
    }

    fn published(&self) -> impl Iterator<Item = &product::Model> {
        self.products
            .iter()
            .filter(|p| p.is_active && p.status == ProductStatus::Published)
    }
}

fn paginate<T: Clone>(items: &[T], page: &PaginationParams) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_products(&self, page: &PaginationParams) -> CatalogResult<ProductListing> {
        let store = self.store.read().await;

        let mut active: Vec<&product::Model> =
            store.products.iter().filter(|p| p.is_active).collect();
        active.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let summary = CatalogSummary {
            total: active.len() as u64,
            published: active
                .iter()
                .filter(|p| p.status == ProductStatus::Published)
                .count() as u64,
            pending: active
                .iter()
                .filter(|p| p.status == ProductStatus::Pending)
                .count() as u64,
            draft: active
                .iter()
                .filter(|p| p.status == ProductStatus::Draft)
                .count() as u64,
            in_stock: active
                .iter()
                .filter(|p| p.stock_status == StockStatus::InStock)
                .count() as u64,
            stock_out: active
                .iter()
                .filter(|p| p.stock_status == StockStatus::OutOfStock)
                .count() as u64,
        };

        let total = active.len() as u64;
        let rows = paginate(&active, page)
            .into_iter()
            .map(|p| store.product_row(p))
            .collect();

        Ok(ProductListing {
            rows,
            summary,
            total,
        })
    }

    async fn search_products(
        &self,
        query: &str,
        page: &PaginationParams,
    ) -> CatalogResult<SearchPage> {
        let store = self.store.read().await;
        let pattern = query.to_lowercase();

        let mut matched: Vec<&product::Model> = store
            .published()
            .filter(|p| store.matches_search(p, &pattern))
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));

        let total = matched.len() as u64;
        let rows = paginate(&matched, page)
            .into_iter()
            .map(|p| store.product_row(p))
            .collect();

        Ok(SearchPage { rows, total })
    }

    async fn find_product_detail(&self, slug: &str) -> CatalogResult<Option<ProductDetailRow>> {
        let store = self.store.read().await;

        let Some(product) = store.published().find(|p| p.slug == slug).cloned() else {
            return Ok(None);
        };

        // A product whose category is gone cannot be projected completely.
        let Some(category) = store
            .categories
            .iter()
            .find(|c| c.id == product.category_id && c.is_active)
            .cloned()
        else {
            return Ok(None);
        };

        let brand = product.brand_id.and_then(|brand_id| {
            store
                .brands
                .iter()
                .find(|b| b.id == brand_id && b.is_active)
                .cloned()
        });

        let variants: Vec<VariantDetailRow> = store
            .variants
            .iter()
            .filter(|v| v.product_id == product.id && v.is_active)
            .map(|v| {
                let attribute_variants = store
                    .variant_attribute_variants
                    .iter()
                    .filter(|&&(variant_id, _)| variant_id == v.id)
                    .filter_map(|&(_, attribute_variant_id)| {
                        let av = store
                            .attribute_variants
                            .iter()
                            .find(|av| av.id == attribute_variant_id && av.is_active)?;
                        let attr = store
                            .attributes
                            .iter()
                            .find(|a| a.id == av.attribute_id && a.is_active)?;
                        Some((av.clone(), attr.clone()))
                    })
                    .collect();

                VariantDetailRow {
                    variant: v.clone(),
                    attribute_variants,
                }
            })
            .collect();

        let mut image_links: Vec<(i64, i32)> = store
            .product_images
            .iter()
            .filter(|&&(product_id, _, _)| product_id == product.id)
            .map(|&(_, image_id, priority)| (image_id, priority))
            .collect();
        image_links.sort_by_key(|&(_, priority)| priority);
        let images: Vec<media::Model> = image_links
            .into_iter()
            .filter_map(|(image_id, _)| store.active_media(image_id).cloned())
            .collect();

        let used_attribute_ids: HashSet<i64> = variants
            .iter()
            .flat_map(|v| v.attribute_variants.iter().map(|(_, a)| a.id))
            .collect();
        let mut attributes: Vec<AttributeDetailRow> = store
            .attributes
            .iter()
            .filter(|a| a.is_active && used_attribute_ids.contains(&a.id))
            .map(|a| AttributeDetailRow {
                attribute: a.clone(),
                variants: store
                    .attribute_variants
                    .iter()
                    .filter(|av| av.attribute_id == a.id && av.is_active)
                    .cloned()
                    .collect(),
            })
            .collect();
        attributes.sort_by(|a, b| a.attribute.name.cmp(&b.attribute.name));

        Ok(Some(ProductDetailRow {
            product,
            brand,
            category,
            variants,
            images,
            attributes,
        }))
    }

    async fn find_category(&self, slug: &str) -> CatalogResult<Option<CategoryRow>> {
        let store = self.store.read().await;

        let Some(category) = store
            .categories
            .iter()
            .find(|c| c.slug == slug && c.is_active)
            .cloned()
        else {
            return Ok(None);
        };

        let (Some(image), Some(banner)) = (
            store.active_media(category.image_id).cloned(),
            store.active_media(category.banner_id).cloned(),
        ) else {
            return Ok(None);
        };

        Ok(Some(CategoryRow {
            category,
            image,
            banner,
        }))
    }

    async fn category_adjacency(&self) -> CatalogResult<Vec<CategoryNode>> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .iter()
            .filter(|c| c.is_active)
            .map(|c| CategoryNode {
                id: c.id,
                parent_id: c.parent_id,
            })
            .collect())
    }

    async fn top_products_in_categories(
        &self,
        category_ids: &HashSet<i64>,
    ) -> CatalogResult<TopProducts> {
        const TOP_LIMIT: usize = 5;

        let store = self.store.read().await;
        let base: Vec<&product::Model> = store
            .published()
            .filter(|p| category_ids.contains(&p.category_id))
            .collect();

        let mut by_rating = base.clone();
        by_rating.sort_by(|a, b| b.rating.cmp(&a.rating));
        let top_rated = by_rating
            .into_iter()
            .take(TOP_LIMIT)
            .map(|p| store.product_row(p))
            .collect();

        let mut by_sold = base;
        by_sold.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
        let top_sold = by_sold
            .into_iter()
            .take(TOP_LIMIT)
            .map(|p| store.product_row(p))
            .collect();

        Ok(TopProducts { top_rated, top_sold })
    }
}
