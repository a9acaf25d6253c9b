//! Stateless Authentication Gate
//!
//! Every request passes through the gate before it reaches a handler. The gate
//! keeps no memory between requests: the decision is recomputed each time from
//! the request itself, the static [`RoutePolicy`] and the bearer token.
//!
//! # Module Structure
//!
//! - [`gate::pattern`](crate::gate::pattern) - Ant-style path patterns
//! - [`gate::policy`](crate::gate::policy) - Ordered public/protected route rules
//! - [`gate::intercept`](crate::gate::intercept) - The per-request decision
//! - [`gate::pipeline`](crate::gate::pipeline) - Composable request stages
//! - [`gate::middleware`](crate::gate::middleware) - Axum adapter and `AuthUser` extractor
//!
//! # Decision Order
//!
//! 1. `OPTIONS` (CORS preflight) on any path is forwarded without credentials.
//! 2. Routes the policy marks public are forwarded without a principal.
//! 3. Everything else needs `Authorization: Bearer <token>`; a valid token
//!    forwards with the [`Principal`](tollgate_token::Principal) in the request
//!    extensions, anything else gets a 401.
//!
//! # Usage
//!
//! ```ignore
//! use tollgate::gate::{AuthGate, Pipeline, RoutePolicy, pipeline_middleware};
//!
//! let gate = AuthGate::new(RoutePolicy::from_config(&config.gate)?, verifier, "api");
//! let pipeline = Arc::new(Pipeline::new().stage(gate));
//!
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(middleware::from_fn_with_state(pipeline, pipeline_middleware));
//! ```
//!
//! ## Extracting the Principal in Handlers
//!
//! ```ignore
//! async fn me(AuthUser(principal): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", principal.subject())
//! }
//! ```

/// Per-request authentication decision.
pub mod intercept;
/// Axum middleware and extractors.
pub mod middleware;
/// Ant-style path patterns.
pub mod pattern;
/// Composable request-processing stages.
pub mod pipeline;
/// Route policy.
pub mod policy;

pub use intercept::{bearer_token, AuthFailure, AuthGate, GateStep, Outcome};
pub use middleware::{pipeline_middleware, AuthUser};
pub use pattern::{PathPattern, PatternError};
pub use pipeline::{Flow, Pipeline, Stage};
pub use policy::{Access, RoutePolicy, RouteRule, TOKEN_PATH};
