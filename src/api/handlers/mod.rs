//! API request handlers.

/// OpenAPI document.
pub mod docs;
/// Liveness probe.
pub mod health;
/// Handlers that act on the authenticated principal.
pub mod principal;
/// Token issuance.
pub mod token;
