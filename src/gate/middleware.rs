use crate::gate::pipeline::{Flow, Pipeline};
use crate::types::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tollgate_token::Principal;

/// Runs the pipeline in front of the router.
///
/// Use with `axum::middleware::from_fn_with_state(pipeline, pipeline_middleware)`.
pub async fn pipeline_middleware(
    State(pipeline): State<Arc<Pipeline>>,
    req: Request,
    next: Next,
) -> Response {
    match pipeline.run(req) {
        Flow::Continue(req) => next.run(req).await,
        Flow::Halt(response) => response,
    }
}

// Extractor for the authenticated principal
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}
