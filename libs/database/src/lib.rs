//! Connectors for the relational store (PostgreSQL via Sea-ORM) and the
//! cache (Redis). Both expose `connect` / `connect_with_retry` plus a
//! health check; configuration structs live in `core_config`.

pub mod error;
pub mod postgres;
pub mod redis;
mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::RetryConfig;
