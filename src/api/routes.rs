use crate::api::handlers;
use crate::gate::{pipeline_middleware, TOKEN_PATH};
use crate::AppState;
use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full application router.
///
/// Every route, public or not, sits behind the request pipeline; which routes
/// need a token is decided by the gate's route policy, not by how the router
/// is assembled.
pub fn create_router(state: AppState) -> Router {
    let pipeline = Arc::clone(&state.pipeline);
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route(TOKEN_PATH, post(handlers::token::issue_token))
        .route("/api-docs", get(handlers::docs::openapi_json))
        .route("/api/me", get(handlers::principal::me))
        .route("/api/admin/ping", get(handlers::principal::admin_ping))
        .fallback(not_found);

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", handlers::docs::ApiDoc::openapi()),
        )
    };

    router
        .layer(middleware::from_fn_with_state(pipeline, pipeline_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for browser clients. An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(crate::types::ErrorResponse {
            error: "not found".to_string(),
        }),
    )
        .into_response()
}

