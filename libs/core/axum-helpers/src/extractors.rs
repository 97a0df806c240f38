//! Query extractor with automatic validation using the validator crate.

use crate::errors::ErrorResponse;
use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query-string extractor that validates the deserialized parameters.
///
/// Malformed or out-of-range parameters are rejected with a structured
/// 400 response before the handler body runs.
///
/// # Example
/// ```ignore
/// async fn list(ValidatedQuery(params): ValidatedQuery<PaginationParams>) { /* ... */ }
/// ```
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                let body = ErrorResponse::new(
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    format!("Invalid query parameters: {}", e),
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            })?;

        data.validate().map_err(|e| {
            let details = e
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let messages: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|err| {
                            serde_json::json!({
                                "code": err.code,
                                "params": err.params,
                            })
                        })
                        .collect();
                    (field.to_string(), serde_json::json!(messages))
                })
                .collect::<serde_json::Map<_, _>>();

            let body = ErrorResponse::new(
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Query parameter validation failed",
            )
            .with_details(serde_json::Value::Object(details));

            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        })?;

        Ok(ValidatedQuery(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PaginationParams;
    use axum::{Router, routing::get};
    use tower::ServiceExt;

    async fn echo(ValidatedQuery(params): ValidatedQuery<PaginationParams>) -> String {
        format!("{}:{}", params.page, params.size)
    }

    fn app() -> Router {
        Router::new().route("/", get(echo))
    }

    #[tokio::test]
    async fn accepts_valid_params() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/?page=2&size=20")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_out_of_range_params() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/?page=0")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_non_numeric_params() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/?page=abc")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
