//! Sea-ORM entities for the catalog tables.
//!
//! Every table carries the common columns `id` (internal, never exposed),
//! `public_id` (the only identifier surfaced to clients), `is_active`
//! (soft delete), `created_at`, `updated_at`. The read paths in this crate
//! never mutate these tables.

pub mod attribute;
pub mod attribute_variant;
pub mod brand;
pub mod category;
pub mod links;
pub mod media;
pub mod product;
pub mod tag;
pub mod variant;
