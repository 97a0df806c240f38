//! Handler tests for the catalog read endpoints: routing, envelope shape,
//! status codes, and the projected payloads, driven against the seeded
//! in-memory repository with an in-memory cache.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use core_config::cache::CacheTtlConfig;
use domain_catalog::{
    CatalogService, InMemoryCatalogCache, InMemoryCatalogRepository, handlers,
};
use http_body_util::BodyExt;
use test_utils::seed_demo_catalog;
use tower::ServiceExt;

async fn app() -> axum::Router {
    let repo = InMemoryCatalogRepository::new();
    seed_demo_catalog(&repo).await;
    let service = CatalogService::new(repo, InMemoryCatalogCache::new(), CacheTtlConfig::default());
    handlers::router(service)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn list_products_returns_envelope_with_pagination_and_summary() {
    let (status, body) = get(app().await, "/products?page=1&size=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Returned successfully");
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["size"], 10);
    // Three active products (the retired tee is excluded)
    assert_eq!(body["pagination"]["total"], 3);

    let summary = &body["data"]["summary"];
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["published"], 2);
    assert_eq!(summary["draft"], 1);
    assert_eq!(summary["pending"], 0);
    assert_eq!(summary["in_stock"], 3);

    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    // Most recently updated first
    assert_eq!(products[0]["slug"], "drift-jacket");
}

#[tokio::test]
async fn listing_projects_price_aggregates_as_strings() {
    let (_, body) = get(app().await, "/products?page=1&size=10").await;

    let products = body["data"]["products"].as_array().unwrap();
    let oxford = products
        .iter()
        .find(|p| p["slug"] == "oxford-buttondown")
        .unwrap();

    // Decimals serialize as fixed-point strings; the inactive 10.00/1.00
    // variant must not leak into the aggregates.
    assert_eq!(oxford["regular_price_min"], "59.00");
    assert_eq!(oxford["regular_price_max"], "64.00");
    assert_eq!(oxford["discount_price_min"], "47.20");
    assert_eq!(oxford["discount_price_max"], "47.20");
    assert_eq!(oxford["discount"], 20);
    assert_eq!(oxford["total_sold"], 25);

    // No variants at all: price fields absent, not zero
    let polo = products.iter().find(|p| p["slug"] == "classic-polo").unwrap();
    assert!(polo.get("regular_price_min").is_none());
    assert!(polo.get("discount").is_none());
}

#[tokio::test]
async fn list_products_rejects_out_of_range_page() {
    let (status, body) = get(app().await, "/products?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn search_matches_via_tag_name_only() {
    let (status, body) = get(app().await, "/products/search?q=shirt").await;

    assert_eq!(status, StatusCode::OK);
    let matches = body["data"].as_array().unwrap();
    // "Classic Polo" carries the "shirt" tag; nothing else mentions shirt
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["slug"], "classic-polo");
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn search_rejects_blank_query() {
    let (status, _) = get(app().await, "/products/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_detail_projects_nested_shapes() {
    let (status, body) = get(app().await, "/products/oxford-buttondown").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("pagination").is_none());

    let detail = &body["data"];
    assert_eq!(detail["name"], "Oxford Buttondown");
    assert_eq!(detail["public_id"], "pub-prod-1");
    assert_eq!(detail["brand"]["name"], "Northwind");
    assert_eq!(detail["brand"]["slug"], "northwind");
    assert_eq!(detail["category"]["slug"], "men-tops");
    assert_eq!(detail["return_policy"], "7_days");
    assert_eq!(detail["exchange_policy"], "3_days");

    // The inactive variant is excluded from the list and the aggregates
    let variants = detail["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);
    assert_eq!(detail["regular_price_min"], "59.00");
    assert_eq!(detail["discount"], 20);

    // Discounted variant: effective price and per-variant percentage
    let discounted = variants
        .iter()
        .find(|v| v["public_id"] == "pub-var-1")
        .unwrap();
    assert_eq!(discounted["price"], "47.20");
    assert_eq!(discounted["discount_percentage"], 20);
    assert_eq!(discounted["attribute_variants"][0]["name"], "S");
    assert_eq!(discounted["attribute_variants"][0]["attribute"]["slug"], "size");

    // Attributes restricted to those used by the variants, with all of
    // the attribute's active options
    let attributes = detail["attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0]["name"], "Size");
    let options: Vec<&str> = attributes[0]["variants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(options, vec!["S", "M"]);

    let images = detail["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["url"], "media/oxford.jpg");
}

#[tokio::test]
async fn product_detail_cache_round_trips_identically() {
    let app = app().await;

    let (first_status, first) = get(app.clone(), "/products/oxford-buttondown").await;
    // The second response is served from the cache and must be deep-equal,
    // decimal, enum, and datetime fields included.
    let (second_status, second) = get(app, "/products/oxford-buttondown").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);

    let discounted = first["data"]["variants"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["public_id"] == "pub-var-1")
        .unwrap();
    assert!(discounted["discount_start_date"].is_string());
    assert!(discounted["discount_end_date"].is_string());
}

#[tokio::test]
async fn unknown_product_slug_is_404() {
    let (status, body) = get(app().await, "/products/no-such-product").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn draft_product_is_not_served_as_detail() {
    let (status, _) = get(app().await, "/products/drift-jacket").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_returns_name_and_media() {
    let (status, body) = get(app().await, "/categories/men").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Men");
    assert_eq!(body["data"]["image"]["url"], "media/men.jpg");
    assert_eq!(body["data"]["banner"]["url"], "media/men-banner.jpg");
}

#[tokio::test]
async fn category_top_products_cover_descendant_closure() {
    // Products live in "men-tops"; querying the parent "men" must surface
    // them through the descendant closure.
    let (status, body) = get(app().await, "/categories/men/top-products").await;

    assert_eq!(status, StatusCode::OK);
    let top_rated = body["data"]["top_rated"].as_array().unwrap();
    let top_sold = body["data"]["top_sold"].as_array().unwrap();

    assert_eq!(top_rated[0]["slug"], "oxford-buttondown"); // rating 4.60
    assert_eq!(top_sold[0]["slug"], "classic-polo"); // 40 sold
    assert_eq!(top_rated.len(), 2);
    assert_eq!(top_sold.len(), 2);
}

#[tokio::test]
async fn unknown_category_slug_is_404_not_empty() {
    let (status, _) = get(app().await, "/categories/no-such-category/top-products").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
