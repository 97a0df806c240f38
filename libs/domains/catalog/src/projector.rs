//! Projection of query rows into the flat, serializable response shapes.

use chrono::{DateTime, Utc};

use crate::entity;
use crate::models::{
    AttributeOut, AttributeRef, AttributeVariantOut, BrandRef, CategoryRef, MediaOut,
    NamedRef, ProductDetail, ProductDetailRow, ProductRow, ProductSummary, VariantDetailRow,
    VariantOut, VariantPrice,
};
use crate::pricing;

pub fn category_out(row: &crate::models::CategoryRow) -> crate::models::CategoryOut {
    crate::models::CategoryOut {
        name: row.category.name.clone(),
        image: media_out(&row.image),
        banner: media_out(&row.banner),
    }
}

pub fn media_out(media: &entity::media::Model) -> MediaOut {
    MediaOut {
        public_id: media.public_id.clone(),
        url: media.storage_key.clone(),
        alt_text: media.alt_text.clone(),
    }
}

/// Flatten a listing/search/top row into the summary shape. Absent
/// aggregates project every price field as absent, not zero.
pub fn product_summary(row: &ProductRow) -> ProductSummary {
    let stats = row.stats.as_ref();

    ProductSummary {
        name: row.name.clone(),
        slug: row.slug.clone(),
        public_id: row.public_id.clone(),
        rating: row.rating,
        regular_price_min: stats.map(|s| s.regular_price_min),
        regular_price_max: stats.map(|s| s.regular_price_max),
        discount_price_min: stats.and_then(|s| s.discount_price_min),
        discount_price_max: stats.and_then(|s| s.discount_price_max),
        discount: stats.and_then(|s| s.max_discount_percentage),
        total_sold: row.total_sold,
    }
}

fn variant_out(row: &VariantDetailRow, at: DateTime<Utc>) -> VariantOut {
    let variant = &row.variant;
    let start = variant.discount_start_date.map(|d| d.with_timezone(&Utc));
    let end = variant.discount_end_date.map(|d| d.with_timezone(&Utc));

    VariantOut {
        public_id: variant.public_id.clone(),
        sku: variant.sku.clone(),
        regular_price: variant.regular_price,
        discount_price: variant.discount_price,
        discount_start_date: start,
        discount_end_date: end,
        price: pricing::effective_price(
            variant.regular_price,
            variant.discount_price,
            start,
            end,
            at,
        ),
        discount_percentage: pricing::discount_percentage(
            variant.regular_price,
            variant.discount_price,
        ),
        stock: variant.stock,
        stock_status: variant.stock_status,
        attribute_variants: row
            .attribute_variants
            .iter()
            .map(|(attribute_variant, attribute)| AttributeVariantOut {
                public_id: attribute_variant.public_id.clone(),
                name: attribute_variant.name.clone(),
                attribute: AttributeRef {
                    public_id: attribute.public_id.clone(),
                    name: attribute.name.clone(),
                    slug: attribute.slug.clone(),
                },
            })
            .collect(),
    }
}

/// Assemble the full detail payload. Price aggregates are recomputed over
/// the row's (active) variants so the detail page and the listings agree.
pub fn product_detail(row: &ProductDetailRow, at: DateTime<Utc>) -> ProductDetail {
    let product = &row.product;

    let prices: Vec<VariantPrice> = row
        .variants
        .iter()
        .map(|v| VariantPrice::new(v.variant.regular_price, v.variant.discount_price))
        .collect();
    let stats = pricing::variant_price_stats(&prices);
    let stats = stats.as_ref();

    ProductDetail {
        name: product.name.clone(),
        slug: product.slug.clone(),
        public_id: product.public_id.clone(),
        description: product.description.clone(),
        rating: product.rating,
        stock_status: product.stock_status,
        return_policy: product.return_policy,
        exchange_policy: product.exchange_policy,
        delivery_time: product.delivery_time,
        total_sold: product.total_sold,
        brand: row.brand.as_ref().map(|brand| BrandRef {
            name: brand.name.clone(),
            slug: brand.slug.clone(),
        }),
        category: CategoryRef {
            name: row.category.name.clone(),
            slug: row.category.slug.clone(),
        },
        images: row.images.iter().map(media_out).collect(),
        attributes: row
            .attributes
            .iter()
            .map(|a| AttributeOut {
                public_id: a.attribute.public_id.clone(),
                name: a.attribute.name.clone(),
                slug: a.attribute.slug.clone(),
                variants: a
                    .variants
                    .iter()
                    .map(|v| NamedRef {
                        public_id: v.public_id.clone(),
                        name: v.name.clone(),
                    })
                    .collect(),
            })
            .collect(),
        variants: row.variants.iter().map(|v| variant_out(v, at)).collect(),
        regular_price_min: stats.map(|s| s.regular_price_min),
        regular_price_max: stats.map(|s| s.regular_price_max),
        discount_price_min: stats.and_then(|s| s.discount_price_min),
        discount_price_max: stats.and_then(|s| s.discount_price_max),
        discount: stats.and_then(|s| s.max_discount_percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantPriceStats;
    use rust_decimal::Decimal;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn row(stats: Option<VariantPriceStats>) -> ProductRow {
        ProductRow {
            name: "Linen Shirt".to_string(),
            slug: "linen-shirt".to_string(),
            public_id: "pub-shirt".to_string(),
            rating: dec("4.25"),
            total_sold: 12,
            stats,
        }
    }

    #[test]
    fn summary_without_stats_has_absent_prices() {
        let summary = product_summary(&row(None));
        assert_eq!(summary.regular_price_min, None);
        assert_eq!(summary.regular_price_max, None);
        assert_eq!(summary.discount_price_min, None);
        assert_eq!(summary.discount_price_max, None);
        assert_eq!(summary.discount, None);
        assert_eq!(summary.total_sold, 12);
    }

    #[test]
    fn summary_flattens_stats() {
        let summary = product_summary(&row(Some(VariantPriceStats {
            regular_price_min: dec("10.00"),
            regular_price_max: dec("25.00"),
            discount_price_min: Some(dec("8.00")),
            discount_price_max: Some(dec("20.00")),
            max_discount_percentage: Some(20),
        })));
        assert_eq!(summary.regular_price_min, Some(dec("10.00")));
        assert_eq!(summary.regular_price_max, Some(dec("25.00")));
        assert_eq!(summary.discount_price_min, Some(dec("8.00")));
        assert_eq!(summary.discount_price_max, Some(dec("20.00")));
        assert_eq!(summary.discount, Some(20));
    }
}
