//! Test infrastructure for the catalog workspace.
//!
//! Provides entity-model builders with sensible defaults and a seeded
//! in-memory catalog used by handler and service tests.

pub mod catalog;

pub use catalog::{builders, seed_demo_catalog};
