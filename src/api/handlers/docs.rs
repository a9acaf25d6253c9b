//! OpenAPI document for the whole API surface.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "bearer_auth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "tollgate",
        description = "Stateless bearer-token authentication gate"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::token::issue_token,
        crate::api::handlers::principal::me,
        crate::api::handlers::principal::admin_ping,
    ),
    components(schemas(
        crate::types::TokenRequest,
        crate::types::TokenResponse,
        crate::types::PrincipalResponse,
        crate::types::StatusResponse,
        crate::types::ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "principal", description = "Endpoints that need a bearer token"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// GET /api-docs
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
