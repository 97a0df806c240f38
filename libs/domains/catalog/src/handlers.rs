use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_helpers::{ApiResponse, PaginationMeta, PaginationParams, ValidatedQuery};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::cache::CatalogCache;
use crate::error::CatalogResult;
use crate::models::{
    CatalogSummary, CategoryOut, CategoryTopProducts, ListingPayload, ProductDetail,
    ProductSummary, SearchParams,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products,
        get_product_detail,
        get_category,
        get_category_top_products,
    ),
    components(schemas(
        ListingPayload,
        ProductSummary,
        ProductDetail,
        CatalogSummary,
        CategoryOut,
        CategoryTopProducts,
    )),
    tags(
        (name = "catalog", description = "Product catalog read endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router with all read endpoints.
pub fn router<R, C>(service: CatalogService<R, C>) -> Router
where
    R: CatalogRepository + 'static,
    C: CatalogCache + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/products/{slug}", get(get_product_detail))
        .route("/categories/{slug}", get(get_category))
        .route(
            "/categories/{slug}/top-products",
            get(get_category_top_products),
        )
        .with_state(shared_service)
}

/// List active products with status/stock counts
#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated product summaries with catalog counts", body = ListingPayload),
        (status = 400, description = "Out-of-range pagination parameters"),
        (status = 500, description = "Store failure")
    )
)]
async fn list_products<R: CatalogRepository, C: CatalogCache>(
    State(service): State<Arc<CatalogService<R, C>>>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> CatalogResult<Json<ApiResponse<ListingPayload>>> {
    let (payload, total) = service.list_products(&params).await?;
    Ok(Json(ApiResponse::paginated(
        payload,
        PaginationMeta::new(&params, total),
    )))
}

/// Search published products by name, slug, product number, brand,
/// category, or tag
#[utoipa::path(
    get,
    path = "/products/search",
    tag = "catalog",
    params(SearchParams),
    responses(
        (status = 200, description = "Paginated product summaries matching the query", body = Vec<ProductSummary>),
        (status = 400, description = "Invalid search parameters"),
        (status = 500, description = "Store failure")
    )
)]
async fn search_products<R: CatalogRepository, C: CatalogCache>(
    State(service): State<Arc<CatalogService<R, C>>>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> CatalogResult<Json<ApiResponse<Vec<ProductSummary>>>> {
    let page = params.pagination();
    let (summaries, total) = service.search_products(&params.q, &page).await?;
    Ok(Json(ApiResponse::paginated(
        summaries,
        PaginationMeta::new(&page, total),
    )))
}

/// Full product detail by slug
#[utoipa::path(
    get,
    path = "/products/{slug}",
    tag = "catalog",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product detail with variants, attributes, brand, category", body = ProductDetail),
        (status = 404, description = "Product missing, inactive, or unpublished"),
        (status = 500, description = "Store failure")
    )
)]
async fn get_product_detail<R: CatalogRepository, C: CatalogCache>(
    State(service): State<Arc<CatalogService<R, C>>>,
    Path(slug): Path<String>,
) -> CatalogResult<Json<ApiResponse<ProductDetail>>> {
    let detail = service.product_detail(&slug).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// Category metadata by slug
#[utoipa::path(
    get,
    path = "/categories/{slug}",
    tag = "catalog",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category name with image and banner", body = CategoryOut),
        (status = 404, description = "Category missing or inactive"),
        (status = 500, description = "Store failure")
    )
)]
async fn get_category<R: CatalogRepository, C: CatalogCache>(
    State(service): State<Arc<CatalogService<R, C>>>,
    Path(slug): Path<String>,
) -> CatalogResult<Json<ApiResponse<CategoryOut>>> {
    let category = service.category(&slug).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// Top-rated and top-sold products of a category subtree
#[utoipa::path(
    get,
    path = "/categories/{slug}/top-products",
    tag = "catalog",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Top-5-by-rating and top-5-by-sold summaries", body = CategoryTopProducts),
        (status = 404, description = "Category missing or inactive"),
        (status = 500, description = "Store failure")
    )
)]
async fn get_category_top_products<R: CatalogRepository, C: CatalogCache>(
    State(service): State<Arc<CatalogService<R, C>>>,
    Path(slug): Path<String>,
) -> CatalogResult<Json<ApiResponse<CategoryTopProducts>>> {
    let top = service.category_top_products(&slug).await?;
    Ok(Json(ApiResponse::ok(top)))
}
