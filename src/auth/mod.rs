//! Credentials and Authorization
//!
//! Token verification lives in the `tollgate-token` crate and the request
//! gate in [`crate::gate`]. This module holds the two pieces around them:
//!
//! - [`auth::credentials`](crate::auth::credentials) - Checks a username and
//!   password on the issuance path and yields the user's authorities
//! - [`auth::authz`](crate::auth::authz) - Explicit authority checks for
//!   handlers that need more than "authenticated"
//!
//! # Password Storage
//!
//! Users are configured with Argon2id PHC hashes, never plaintext. Generate
//! one with `tollgate-server hash-password <password>`.
//!
//! ```toml
//! [[credentials.users]]
//! username = "admin"
//! password_hash = "$argon2id$v=19$m=19456,t=2,p=1$..."
//! authorities = ["ROLE_ADMIN", "ROLE_USER"]
//! ```
//!
//! # Authorization in Handlers
//!
//! ```ignore
//! use tollgate::auth::authz::require_authority;
//!
//! async fn admin_ping(AuthUser(principal): AuthUser) -> Result<Json<StatusResponse>> {
//!     require_authority(&principal, "ROLE_ADMIN")?;
//!     Ok(Json(StatusResponse { status: "ok".into() }))
//! }
//! ```

/// Authority predicates returning `403` on failure.
pub mod authz;
/// Credential verification for token issuance.
pub mod credentials;

pub use authz::{require_all, require_any, require_authority};
pub use credentials::{
    hash_password, verify_password, Argon2CredentialStore, CredentialError, CredentialVerifier,
};
