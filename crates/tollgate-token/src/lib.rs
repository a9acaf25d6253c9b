//! # tollgate-token
//!
//! Stateless signed bearer tokens. Issues HS256 JSON Web Tokens and verifies
//! them back into a [`Principal`] without keeping any server-side state.
//!
//! This crate knows nothing about HTTP; the gate in `tollgate` decides when to
//! call it and how to answer clients.
//!
//! ## Quick Start
//!
//! ```rust
//! use tollgate_token::TokenVerifier;
//!
//! let verifier = TokenVerifier::new(b"a-signing-secret-of-at-least-32-bytes", 3600)?;
//! let token = verifier.issue("alice", &["ROLE_USER".to_string()])?;
//!
//! let principal = verifier.verify(token.as_str())?;
//! assert_eq!(principal.subject(), "alice");
//! assert!(principal.has_authority("ROLE_USER"));
//! # Ok::<(), tollgate_token::TokenError>(())
//! ```
//!
//! ## Validity
//!
//! A token is valid iff its signature verifies against the secret and
//! `iat <= now < exp`. Failures are reported as distinct [`TokenError`]
//! variants so callers can log the cause.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Claim set and issued token.
pub mod claims;
/// Time sources.
pub mod clock;
/// Error types.
pub mod error;
/// Authenticated identity.
pub mod principal;
/// Issuance and verification.
pub mod verifier;

pub use claims::{Claims, Token};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, TokenError};
pub use principal::Principal;
pub use verifier::{TokenVerifier, MAX_TTL_SECS};
