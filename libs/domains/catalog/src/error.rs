use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] sea_orm::DbErr),

    /// Never surfaces to callers on the read paths (the cache layer is
    /// fail-open); kept for completeness of the taxonomy.
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{} not found", what))
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(message) => AppError::NotFound(message),
            CatalogError::Validation(message) => AppError::BadRequest(message),
            CatalogError::Store(e) => AppError::Database(e),
            CatalogError::Cache(e) => AppError::ServiceUnavailable(e.to_string()),
            CatalogError::Serialization(e) => AppError::SerdeJson(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
