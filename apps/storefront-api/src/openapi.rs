use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Top-level OpenAPI document, nesting the catalog domain's paths under
/// the `/api` prefix they are served from.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Catalog API",
        description = "Read API for the product catalog"
    ),
    nest(
        (path = "/api", api = domain_catalog::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
