use domain_catalog::InMemoryCatalogRepository;

/// Entity-model constructors with test defaults. Override fields on the
/// returned model where a test needs something specific.
pub mod builders {
    use chrono::TimeZone;
    use domain_catalog::entity::{
        attribute, attribute_variant, brand, category, media, product, tag, variant,
    };
    use domain_catalog::models::{
        ExchangePolicy, ProductStatus, ProductType, ReturnPolicy, StockStatus,
    };
    use rust_decimal::Decimal;

    pub fn ts(secs: i64) -> chrono::DateTime<chrono::FixedOffset> {
        chrono::Utc.timestamp_opt(secs, 0).unwrap().into()
    }

    pub fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    pub fn product(id: i64, name: &str, slug: &str, status: ProductStatus) -> product::Model {
        product::Model {
            id,
            public_id: format!("pub-prod-{}", id),
            name: name.to_string(),
            slug: slug.to_string(),
            product_no: format!("P-{:04}", id),
            description: format!("{} description", name),
            short_description: None,
            meta_description: None,
            video: None,
            delivery_time: Some(3),
            stock_management: false,
            rating: dec("4.00"),
            total_sold: 0,
            product_type: ProductType::Variable,
            status,
            stock_status: StockStatus::InStock,
            return_policy: ReturnPolicy::SevenDays,
            exchange_policy: ExchangePolicy::ThreeDays,
            brand_id: None,
            category_id: 1,
            seller_id: 1,
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn variant(
        id: i64,
        product_id: i64,
        regular: &str,
        discount: Option<&str>,
    ) -> variant::Model {
        variant::Model {
            id,
            public_id: format!("pub-var-{}", id),
            sku: Some(format!("SKU-{:04}", id)),
            description: None,
            product_id,
            image_id: None,
            regular_price: dec(regular),
            discount_price: discount.map(dec),
            discount_start_date: None,
            discount_end_date: None,
            stock_status: StockStatus::InStock,
            stock: Some(25),
            low_stock_threshold: Some(5),
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn category(id: i64, name: &str, slug: &str, parent_id: Option<i64>) -> category::Model {
        category::Model {
            id,
            public_id: format!("pub-cat-{}", id),
            name: name.to_string(),
            slug: slug.to_string(),
            image_id: 1,
            banner_id: 2,
            parent_id,
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn brand(id: i64, name: &str, slug: &str) -> brand::Model {
        brand::Model {
            id,
            public_id: format!("pub-brand-{}", id),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            image_id: 3,
            seller_id: None,
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn tag(id: i64, name: &str, slug: &str) -> tag::Model {
        tag::Model {
            id,
            public_id: format!("pub-tag-{}", id),
            name: name.to_string(),
            slug: slug.to_string(),
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn attribute(id: i64, name: &str, slug: &str) -> attribute::Model {
        attribute::Model {
            id,
            public_id: format!("pub-attr-{}", id),
            name: name.to_string(),
            slug: slug.to_string(),
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn attribute_variant(id: i64, attribute_id: i64, name: &str) -> attribute_variant::Model {
        attribute_variant::Model {
            id,
            public_id: format!("pub-attrvar-{}", id),
            name: name.to_string(),
            attribute_id,
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }

    pub fn media(id: i64, storage_key: &str, alt_text: &str) -> media::Model {
        media::Model {
            id,
            public_id: format!("pub-media-{}", id),
            alt_text: alt_text.to_string(),
            storage_key: storage_key.to_string(),
            is_active: true,
            created_at: ts(id),
            updated_at: ts(id),
        }
    }
}

/// Seed a small but complete catalog:
///
/// - categories: `men` (1, root) ← `men-tops` (2)
/// - brand 1 "Northwind"
/// - tag 1 "shirt"
/// - attribute 1 "Size" with variants S (1) and M (2)
/// - product 1 "Oxford Buttondown" (published, men-tops, Northwind,
///   rating 4.60, 25 sold): active variants 59.00/47.20 (Size S, window
///   1970..2100) and 64.00 (Size M), one inactive variant, one gallery
///   image
/// - product 2 "Classic Polo" (published, men-tops, rating 3.80,
///   40 sold, no variants) tagged "shirt"
/// - product 3 "Drift Jacket" (draft)
/// - product 4 "Retired Tee" (published but inactive)
pub async fn seed_demo_catalog(repo: &InMemoryCatalogRepository) {
    use builders::*;
    use domain_catalog::models::ProductStatus;

    repo.insert_media(media(1, "media/men.jpg", "Menswear")).await;
    repo.insert_media(media(2, "media/men-banner.jpg", "Menswear banner"))
        .await;
    repo.insert_media(media(3, "media/oxford.jpg", "Oxford buttondown"))
        .await;

    repo.insert_category(category(1, "Men", "men", None)).await;
    repo.insert_category(category(2, "Men's Tops", "men-tops", Some(1)))
        .await;

    repo.insert_brand(brand(1, "Northwind", "northwind")).await;
    repo.insert_tag(tag(1, "shirt", "shirt")).await;

    repo.insert_attribute(attribute(1, "Size", "size")).await;
    repo.insert_attribute_variant(attribute_variant(1, 1, "S")).await;
    repo.insert_attribute_variant(attribute_variant(2, 1, "M")).await;

    let mut oxford = product(1, "Oxford Buttondown", "oxford-buttondown", ProductStatus::Published);
    oxford.category_id = 2;
    oxford.brand_id = Some(1);
    oxford.rating = dec("4.60");
    oxford.total_sold = 25;
    repo.insert_product(oxford).await;

    let mut discounted = variant(1, 1, "59.00", Some("47.20"));
    discounted.discount_start_date = Some(ts(0));
    // 2100-01-01, comfortably open
    discounted.discount_end_date = Some(ts(4_102_444_800));
    repo.insert_variant(discounted).await;
    repo.insert_variant(variant(2, 1, "64.00", None)).await;
    let mut retired_variant = variant(3, 1, "10.00", Some("1.00"));
    retired_variant.is_active = false;
    repo.insert_variant(retired_variant).await;

    repo.link_attribute_variant(1, 1).await;
    repo.link_attribute_variant(2, 2).await;
    repo.link_image(1, 3, 1).await;

    let mut polo = product(2, "Classic Polo", "classic-polo", ProductStatus::Published);
    polo.category_id = 2;
    polo.rating = dec("3.80");
    polo.total_sold = 40;
    repo.insert_product(polo).await;
    repo.link_tag(2, 1).await;

    repo.insert_product(product(3, "Drift Jacket", "drift-jacket", ProductStatus::Draft))
        .await;

    let mut retired = product(4, "Retired Tee", "retired-tee", ProductStatus::Published);
    retired.is_active = false;
    repo.insert_product(retired).await;
}
