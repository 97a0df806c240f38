use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    10
}

/// Pagination query parameters.
///
/// Bounds are enforced before any query runs: `page >= 1`,
/// `1 <= size <= 100`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100))]
    pub size: u64,
}

impl PaginationParams {
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.size
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

/// Pagination metadata echoed in paginated response envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub size: u64,
    /// Total number of items across all pages
    pub total: u64,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: u64) -> Self {
        Self {
            page: params.page,
            size: params.size,
            total,
        }
    }
}
