//! HTTP API Handlers and Routes
//!
//! The REST surface of tollgate, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Router assembly and layers
//!
//! # API Endpoints
//!
//! - `POST /api/token` - Exchange username and password for a bearer token
//! - `GET /api/me` - The authenticated principal
//! - `GET /api/admin/ping` - Requires `ROLE_ADMIN`
//! - `GET /health` - Liveness probe
//! - `GET /api-docs` - OpenAPI document
//!
//! # Authentication
//!
//! Everything except the token endpoint, the documentation routes, the health
//! probe and CORS preflight requests needs a token:
//! ```text
//! Authorization: Bearer <token>
//! ```
//! Unknown paths are protected too, so an unauthenticated caller cannot probe
//! which routes exist.
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

pub use routes::create_router;
