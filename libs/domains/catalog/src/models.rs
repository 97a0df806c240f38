use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter, FromQueryResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use crate::entity;

/// Product lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// Stock availability bucket
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stock_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "out_of_stock")]
    OutOfStock,
}

/// Simple products have no variant axes; variable products do
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_type")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductType {
    #[sea_orm(string_value = "simple")]
    Simple,
    #[sea_orm(string_value = "variable")]
    Variable,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "return_policy")]
pub enum ReturnPolicy {
    #[sea_orm(string_value = "instant")]
    #[serde(rename = "instant")]
    #[strum(serialize = "instant")]
    Instant,
    #[sea_orm(string_value = "3_days")]
    #[serde(rename = "3_days")]
    #[strum(serialize = "3_days")]
    ThreeDays,
    #[sea_orm(string_value = "7_days")]
    #[serde(rename = "7_days")]
    #[strum(serialize = "7_days")]
    SevenDays,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "exchange_policy")]
pub enum ExchangePolicy {
    #[sea_orm(string_value = "not_exchangeable")]
    #[serde(rename = "not_exchangeable")]
    #[strum(serialize = "not_exchangeable")]
    NotExchangeable,
    #[sea_orm(string_value = "3_days")]
    #[serde(rename = "3_days")]
    #[strum(serialize = "3_days")]
    ThreeDays,
    #[sea_orm(string_value = "7_days")]
    #[serde(rename = "7_days")]
    #[strum(serialize = "7_days")]
    SevenDays,
}

/// Price columns of one variant, the input to the aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPrice {
    pub regular: Decimal,
    pub discount: Option<Decimal>,
}

impl VariantPrice {
    pub fn new(regular: Decimal, discount: Option<Decimal>) -> Self {
        Self { regular, discount }
    }
}

/// Per-product aggregate over its active variants.
///
/// Present only when the product has at least one active variant; the
/// discount fields are additionally absent when no variant carries a
/// non-zero discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPriceStats {
    pub regular_price_min: Decimal,
    pub regular_price_max: Decimal,
    pub discount_price_min: Option<Decimal>,
    pub discount_price_max: Option<Decimal>,
    pub max_discount_percentage: Option<i32>,
}

/// Status/stock counts over the whole active product set, independent of
/// pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogSummary {
    pub total: u64,
    pub published: u64,
    pub pending: u64,
    pub draft: u64,
    pub in_stock: u64,
    pub stock_out: u64,
}

/// One product row of a listing/search/top query, with its aggregate
/// variant-price statistics when it has active variants.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub name: String,
    pub slug: String,
    pub public_id: String,
    pub rating: Decimal,
    pub total_sold: i64,
    pub stats: Option<VariantPriceStats>,
}

/// `(id, parent_id)` pair of an active category, the adjacency input to
/// the category-tree resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct CategoryNode {
    pub id: i64,
    pub parent_id: Option<i64>,
}

/// Listing query result: one page of rows plus the pagination-independent
/// summary and total.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub rows: Vec<ProductRow>,
    pub summary: CatalogSummary,
    pub total: u64,
}

/// Search query result page.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub rows: Vec<ProductRow>,
    pub total: u64,
}

/// The two top-5 slices of a category's product set.
#[derive(Debug, Clone, Default)]
pub struct TopProducts {
    pub top_rated: Vec<ProductRow>,
    pub top_sold: Vec<ProductRow>,
}

/// One variant of the detail query, with its attribute variants and their
/// attributes (all active).
#[derive(Debug, Clone)]
pub struct VariantDetailRow {
    pub variant: entity::variant::Model,
    pub attribute_variants: Vec<(entity::attribute_variant::Model, entity::attribute::Model)>,
}

/// One attribute used by the product's variants, with all of the
/// attribute's active variants.
#[derive(Debug, Clone)]
pub struct AttributeDetailRow {
    pub attribute: entity::attribute::Model,
    pub variants: Vec<entity::attribute_variant::Model>,
}

/// Detail query result: the product with everything eagerly loaded.
#[derive(Debug, Clone)]
pub struct ProductDetailRow {
    pub product: entity::product::Model,
    pub brand: Option<entity::brand::Model>,
    pub category: entity::category::Model,
    pub variants: Vec<VariantDetailRow>,
    pub images: Vec<entity::media::Model>,
    pub attributes: Vec<AttributeDetailRow>,
}

/// Category metadata query result.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub category: entity::category::Model,
    pub image: entity::media::Model,
    pub banner: entity::media::Model,
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Flat product summary used by listing, search, and top-products
/// responses. Price fields are absent (not zero) when the product has no
/// active variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub name: String,
    pub slug: String,
    pub public_id: String,
    pub rating: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price_max: Option<Decimal>,
    /// Maximum discount across variants, as a rounded integer percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i32>,
    pub total_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaOut {
    pub public_id: String,
    pub url: String,
    pub alt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BrandRef {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeRef {
    pub public_id: String,
    pub name: String,
    pub slug: String,
}

/// Attribute-variant reference, e.g. "Red" or "XL"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NamedRef {
    pub public_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeVariantOut {
    pub public_id: String,
    pub name: String,
    pub attribute: AttributeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VariantOut {
    pub public_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub regular_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_end_date: Option<DateTime<Utc>>,
    /// Effective price at response time, the discount window applied
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    pub stock_status: StockStatus,
    pub attribute_variants: Vec<AttributeVariantOut>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeOut {
    pub public_id: String,
    pub name: String,
    pub slug: String,
    pub variants: Vec<NamedRef>,
}

/// Full product detail page payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    pub name: String,
    pub slug: String,
    pub public_id: String,
    pub description: String,
    pub rating: Decimal,
    pub stock_status: StockStatus,
    pub return_policy: ReturnPolicy,
    pub exchange_policy: ExchangePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<i32>,
    pub total_sold: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<BrandRef>,
    pub category: CategoryRef,
    pub images: Vec<MediaOut>,
    pub attributes: Vec<AttributeOut>,
    pub variants: Vec<VariantOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i32>,
}

/// Listing endpoint payload: one page of summaries plus the catalog-wide
/// status counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListingPayload {
    pub products: Vec<ProductSummary>,
    pub summary: CatalogSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryOut {
    pub name: String,
    pub image: MediaOut,
    pub banner: MediaOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTopProducts {
    pub top_rated: Vec<ProductSummary>,
    pub top_sold: Vec<ProductSummary>,
}

/// Wire format of a cached paginated payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPage<T> {
    pub data: T,
    pub total: u64,
}

/// Search endpoint query parameters.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, utoipa::IntoParams)]
pub struct SearchParams {
    /// Free-text search input
    #[validate(length(min = 1, max = 100))]
    pub q: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100))]
    pub size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    10
}

impl SearchParams {
    pub fn pagination(&self) -> axum_helpers::PaginationParams {
        axum_helpers::PaginationParams {
            page: self.page,
            size: self.size,
        }
    }
}
