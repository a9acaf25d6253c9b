//! # tollgate - Stateless Bearer-Token Authentication Gate
//!
//! tollgate puts a per-request authentication decision in front of an Axum
//! application. Nothing about a caller is remembered between requests: each
//! request either carries a valid signed token in `Authorization: Bearer`,
//! hits a route the policy marks public, or gets a uniform `401`.
//!
//! ## Overview
//!
//! tollgate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `tollgate-server` binary
//! 2. **As a library** - Put the gate in front of your own router
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tollgate::gate::{pipeline_middleware, AuthGate, Pipeline, RoutePolicy};
//! use tollgate::TokenVerifier;
//!
//! let verifier = Arc::new(TokenVerifier::new(secret.as_bytes(), 3600)?);
//! let policy = RoutePolicy::from_config(&config.gate)?;
//! let pipeline = Arc::new(Pipeline::new().stage(AuthGate::new(policy, verifier, "api")));
//!
//! let app = my_router.layer(axum::middleware::from_fn_with_state(pipeline, pipeline_middleware));
//! ```
//!
//! ### Configuration-Driven Setup
//!
//! ```rust,ignore
//! use tollgate::{AppState, TollgateConfig};
//!
//! let config = TollgateConfig::load("tollgate.toml")?;
//! let app = tollgate::app(AppState::from_config(config)?);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Serve Swagger UI at `/swagger-ui` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Credential verification and authorization predicates
//! - [`gate`] - Route policy, request pipeline and the authentication gate
//! - [`cli`] - Command-line interface
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Credential verification and authorization predicates.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Stateless authentication gate.
pub mod gate;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use api::create_router as app;
pub use auth::{Argon2CredentialStore, CredentialError, CredentialVerifier};
pub use gate::{AuthGate, AuthUser, Pipeline, RoutePolicy};
pub use tollgate_token::{Principal, Token, TokenError, TokenVerifier};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, TollgateConfig};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable TOML configuration
    pub config: Arc<TollgateConfig>,
    /// Token issuance and verification
    pub verifier: Arc<TokenVerifier>,
    /// Credential check for the issuance endpoint
    pub credentials: Arc<dyn CredentialVerifier>,
    /// Request pipeline run before every route
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Assembles state from already-built collaborators. The pipeline is
    /// derived from `config.gate`.
    pub fn new(
        config: TollgateConfig,
        verifier: Arc<TokenVerifier>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> std::result::Result<Self, ConfigError> {
        let policy = RoutePolicy::from_config(&config.gate)?;
        let gate = AuthGate::new(policy, Arc::clone(&verifier), config.gate.realm.clone());
        let pipeline = Pipeline::new().stage(gate);

        Ok(Self {
            config: Arc::new(config),
            verifier,
            credentials,
            pipeline: Arc::new(pipeline),
        })
    }

    /// Builds everything from configuration: validates it, reads the signing
    /// secret from the environment and loads the user table.
    pub fn from_config(config: TollgateConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let verifier = build_verifier(&config)?;
        let credentials = Argon2CredentialStore::from_config(&config.credentials)?;
        tracing::info!(users = credentials.len(), "Credential store loaded");

        Self::new(config, Arc::new(verifier), Arc::new(credentials))
    }
}

/// Creates the token verifier from `[auth]` and the secret environment variable.
pub fn build_verifier(config: &TollgateConfig) -> std::result::Result<TokenVerifier, ConfigError> {
    let secret = config.jwt_secret()?;
    TokenVerifier::new(secret.as_bytes(), config.auth.token_ttl_secs)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("verifier", &self.verifier)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
