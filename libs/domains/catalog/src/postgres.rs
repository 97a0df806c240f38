use async_trait::async_trait;
use axum_helpers::PaginationParams;
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::{HashMap, HashSet};

use crate::entity::links::{product_images, product_tags, variant_attribute_variants};
use crate::entity::{attribute, attribute_variant, brand, category, media, product, tag, variant};
use crate::error::CatalogResult;
use crate::models::{
    AttributeDetailRow, CatalogSummary, CategoryNode, CategoryRow, ProductDetailRow,
    ProductListing, ProductRow, ProductStatus, SearchPage, StockStatus, TopProducts,
    VariantDetailRow, VariantPrice, VariantPriceStats,
};
use crate::pricing;
use crate::repository::CatalogRepository;

const TOP_LIMIT: u64 = 5;

/// Postgres implementation of [`CatalogRepository`] over Sea-ORM.
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active-variant price rows for the given products, aggregated per
    /// product by the shared pricing rules.
    async fn load_stats(
        &self,
        product_ids: &[i64],
    ) -> CatalogResult<HashMap<i64, VariantPriceStats>> {
        #[derive(FromQueryResult)]
        struct VariantPriceRow {
            product_id: i64,
            regular_price: Decimal,
            discount_price: Option<Decimal>,
        }

        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = variant::Entity::find()
            .select_only()
            .column(variant::Column::ProductId)
            .column(variant::Column::RegularPrice)
            .column(variant::Column::DiscountPrice)
            .filter(variant::Column::IsActive.eq(true))
            .filter(variant::Column::ProductId.is_in(product_ids.iter().copied()))
            .into_model::<VariantPriceRow>()
            .all(&self.db)
            .await?;

        Ok(pricing::stats_by_product(rows.into_iter().map(|row| {
            (
                row.product_id,
                VariantPrice::new(row.regular_price, row.discount_price),
            )
        })))
    }

    async fn rows_with_stats(&self, models: Vec<product::Model>) -> CatalogResult<Vec<ProductRow>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut stats = self.load_stats(&ids).await?;

        Ok(models
            .into_iter()
            .map(|model| ProductRow {
                stats: stats.remove(&model.id),
                name: model.name,
                slug: model.slug,
                public_id: model.public_id,
                rating: model.rating,
                total_sold: model.total_sold,
            })
            .collect())
    }

    /// Status/stock counts over the whole active set, one grouped query per
    /// bucket axis. Runs unpaginated so the summary never depends on the
    /// requested page.
    async fn load_summary(&self) -> CatalogResult<CatalogSummary> {
        #[derive(FromQueryResult)]
        struct StatusCountRow {
            status: ProductStatus,
            count: i64,
        }

        #[derive(FromQueryResult)]
        struct StockCountRow {
            stock_status: StockStatus,
            count: i64,
        }

        let status_counts = product::Entity::find()
            .select_only()
            .column(product::Column::Status)
            .column_as(product::Column::Id.count(), "count")
            .filter(product::Column::IsActive.eq(true))
            .group_by(product::Column::Status)
            .into_model::<StatusCountRow>()
            .all(&self.db)
            .await?;

        let stock_counts = product::Entity::find()
            .select_only()
            .column(product::Column::StockStatus)
            .column_as(product::Column::Id.count(), "count")
            .filter(product::Column::IsActive.eq(true))
            .group_by(product::Column::StockStatus)
            .into_model::<StockCountRow>()
            .all(&self.db)
            .await?;

        let mut summary = CatalogSummary::default();
        for row in status_counts {
            let count = row.count as u64;
            summary.total += count;
            match row.status {
                ProductStatus::Published => summary.published = count,
                ProductStatus::Pending => summary.pending = count,
                ProductStatus::Draft => summary.draft = count,
                ProductStatus::Archived => {}
            }
        }
        for row in stock_counts {
            match row.stock_status {
                StockStatus::InStock => summary.in_stock = row.count as u64,
                StockStatus::OutOfStock => summary.stock_out = row.count as u64,
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_products(&self, page: &PaginationParams) -> CatalogResult<ProductListing> {
        let base = product::Entity::find().filter(product::Column::IsActive.eq(true));

        let total = base.clone().count(&self.db).await?;
        let summary = self.load_summary().await?;

        let models = base
            .order_by_desc(product::Column::UpdatedAt)
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await?;

        Ok(ProductListing {
            rows: self.rows_with_stats(models).await?,
            summary,
            total,
        })
    }

    async fn search_products(
        &self,
        query: &str,
        page: &PaginationParams,
    ) -> CatalogResult<SearchPage> {
        let pattern = format!("%{}%", query);

        let tagged = Query::select()
            .column(product_tags::Column::ProductId)
            .from(product_tags::Entity)
            .inner_join(
                tag::Entity,
                Expr::col((tag::Entity, tag::Column::Id))
                    .equals((product_tags::Entity, product_tags::Column::TagId)),
            )
            .and_where(Expr::col((tag::Entity, tag::Column::IsActive)).eq(true))
            .and_where(Expr::col((tag::Entity, tag::Column::Name)).ilike(pattern.as_str()))
            .to_owned();

        let matches = Condition::any()
            .add(Expr::col((product::Entity, product::Column::Name)).ilike(pattern.as_str()))
            .add(Expr::col((product::Entity, product::Column::Slug)).ilike(pattern.as_str()))
            .add(Expr::col((product::Entity, product::Column::ProductNo)).ilike(pattern.as_str()))
            .add(
                Condition::all()
                    .add(Expr::col((brand::Entity, brand::Column::IsActive)).eq(true))
                    .add(Expr::col((brand::Entity, brand::Column::Name)).ilike(pattern.as_str())),
            )
            .add(
                Condition::all()
                    .add(Expr::col((category::Entity, category::Column::IsActive)).eq(true))
                    .add(Expr::col((category::Entity, category::Column::Name)).ilike(pattern.as_str())),
            )
            .add(product::Column::Id.in_subquery(tagged));

        let base = product::Entity::find()
            .join(JoinType::LeftJoin, product::Relation::Brand.def())
            .join(JoinType::LeftJoin, product::Relation::Category.def())
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Status.eq(ProductStatus::Published))
            .filter(matches);

        let total = base.clone().count(&self.db).await?;

        let models = base
            .order_by_asc(product::Column::Name)
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await?;

        Ok(SearchPage {
            rows: self.rows_with_stats(models).await?,
            total,
        })
    }

    async fn find_product_detail(&self, slug: &str) -> CatalogResult<Option<ProductDetailRow>> {
        let Some(product) = product::Entity::find()
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Status.eq(ProductStatus::Published))
            .filter(product::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        // The category is a required part of the detail shape; a product
        // whose category has been deactivated is not presentable.
        let Some(category) = category::Entity::find_by_id(product.category_id)
            .filter(category::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let brand = match product.brand_id {
            Some(brand_id) => {
                brand::Entity::find_by_id(brand_id)
                    .filter(brand::Column::IsActive.eq(true))
                    .one(&self.db)
                    .await?
            }
            None => None,
        };

        let variant_models = variant::Entity::find()
            .filter(variant::Column::ProductId.eq(product.id))
            .filter(variant::Column::IsActive.eq(true))
            .order_by_asc(variant::Column::Id)
            .all(&self.db)
            .await?;
        let variant_ids: Vec<i64> = variant_models.iter().map(|v| v.id).collect();

        let links = if variant_ids.is_empty() {
            Vec::new()
        } else {
            variant_attribute_variants::Entity::find()
                .filter(
                    variant_attribute_variants::Column::VariantId.is_in(variant_ids.clone()),
                )
                .all(&self.db)
                .await?
        };

        let linked_ids: Vec<i64> = links.iter().map(|l| l.attribute_variant_id).collect();
        let linked_attribute_variants = if linked_ids.is_empty() {
            Vec::new()
        } else {
            attribute_variant::Entity::find()
                .filter(attribute_variant::Column::Id.is_in(linked_ids))
                .filter(attribute_variant::Column::IsActive.eq(true))
                .all(&self.db)
                .await?
        };
        let attribute_variant_map: HashMap<i64, attribute_variant::Model> =
            linked_attribute_variants
                .into_iter()
                .map(|av| (av.id, av))
                .collect();

        let used_attribute_ids: HashSet<i64> = attribute_variant_map
            .values()
            .map(|av| av.attribute_id)
            .collect();
        let attribute_models = if used_attribute_ids.is_empty() {
            Vec::new()
        } else {
            attribute::Entity::find()
                .filter(attribute::Column::Id.is_in(used_attribute_ids.iter().copied()))
                .filter(attribute::Column::IsActive.eq(true))
                .order_by_asc(attribute::Column::Name)
                .all(&self.db)
                .await?
        };
        let attribute_map: HashMap<i64, attribute::Model> = attribute_models
            .iter()
            .cloned()
            .map(|a| (a.id, a))
            .collect();

        // All active variants of each used attribute, for the attribute
        // facet list.
        let attribute_variant_lists = if attribute_map.is_empty() {
            Vec::new()
        } else {
            attribute_variant::Entity::find()
                .filter(
                    attribute_variant::Column::AttributeId
                        .is_in(attribute_map.keys().copied()),
                )
                .filter(attribute_variant::Column::IsActive.eq(true))
                .order_by_asc(attribute_variant::Column::Id)
                .all(&self.db)
                .await?
        };

        let variants: Vec<VariantDetailRow> = variant_models
            .into_iter()
            .map(|variant| {
                let attribute_variants = links
                    .iter()
                    .filter(|l| l.variant_id == variant.id)
                    .filter_map(|l| {
                        let av = attribute_variant_map.get(&l.attribute_variant_id)?;
                        let attr = attribute_map.get(&av.attribute_id)?;
                        Some((av.clone(), attr.clone()))
                    })
                    .collect();
                VariantDetailRow {
                    variant,
                    attribute_variants,
                }
            })
            .collect();

        let attributes: Vec<AttributeDetailRow> = attribute_models
            .into_iter()
            .map(|attribute| AttributeDetailRow {
                variants: attribute_variant_lists
                    .iter()
                    .filter(|av| av.attribute_id == attribute.id)
                    .cloned()
                    .collect(),
                attribute,
            })
            .collect();

        let image_links = product_images::Entity::find()
            .filter(product_images::Column::ProductId.eq(product.id))
            .order_by_asc(product_images::Column::Priority)
            .all(&self.db)
            .await?;
        let image_ids: Vec<i64> = image_links.iter().map(|l| l.image_id).collect();
        let media_map: HashMap<i64, media::Model> = if image_ids.is_empty() {
            HashMap::new()
        } else {
            media::Entity::find()
                .filter(media::Column::Id.is_in(image_ids))
                .filter(media::Column::IsActive.eq(true))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };
        let images: Vec<media::Model> = image_links
            .iter()
            .filter_map(|l| media_map.get(&l.image_id).cloned())
            .collect();

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
        let Some(category) = category::Entity::find()
            .filter(category::Column::IsActive.eq(true))
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let image = media::Entity::find_by_id(category.image_id)
            .filter(media::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;
        let banner = media::Entity::find_by_id(category.banner_id)
            .filter(media::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        let (Some(image), Some(banner)) = (image, banner) else {
            return Ok(None);
        };

        Ok(Some(CategoryRow {
            category,
            image,
            banner,
        }))
    }

    async fn category_adjacency(&self) -> CatalogResult<Vec<CategoryNode>> {
        Ok(category::Entity::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::ParentId)
            .filter(category::Column::IsActive.eq(true))
            .into_model::<CategoryNode>()
            .all(&self.db)
            .await?)
    }

    async fn top_products_in_categories(
        &self,
        category_ids: &HashSet<i64>,
    ) -> CatalogResult<TopProducts> {
        if category_ids.is_empty() {
            return Ok(TopProducts::default());
        }

        let base = product::Entity::find()
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Status.eq(ProductStatus::Published))
            .filter(product::Column::CategoryId.is_in(category_ids.iter().copied()));

        let top_rated_models = base
            .clone()
            .order_by_desc(product::Column::Rating)
            .limit(TOP_LIMIT)
            .all(&self.db)
            .await?;
        let top_sold_models = base
            .order_by_desc(product::Column::TotalSold)
            .limit(TOP_LIMIT)
            .all(&self.db)
            .await?;

        Ok(TopProducts {
            top_rated: self.rows_with_stats(top_rated_models).await?,
            top_sold: self.rows_with_stats(top_sold_models).await?,
        })
    }
}
