//! Catalog Domain
//!
//! Read-side of the product catalog: paginated listings, free-text search,
//! category browsing, and product detail pages, served cache-aside from
//! Redis in front of the relational store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────┐
//! │   Service   │ ──▶ │  Cache   │  ← cache-aside, per-path TTLs
//! └──────┬──────┘     └──────────┘
//!        │ miss
//! ┌──────▼──────┐
//! │ Repository  │  ← query contracts (Postgres or in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Projector  │  ← rows → response shapes
//! └─────────────┘
//! ```

pub mod cache;
pub mod category_tree;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod pricing;
pub mod projector;
pub mod repository;
pub mod service;

pub use cache::{CatalogCache, InMemoryCatalogCache, RedisCatalogCache};
pub use error::{CatalogError, CatalogResult};
pub use models::{
    CatalogSummary, CategoryOut, CategoryTopProducts, ExchangePolicy, ListingPayload,
    ProductDetail, ProductStatus, ProductSummary, ProductType, ReturnPolicy, StockStatus,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::CatalogService;
