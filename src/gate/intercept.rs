//! Per-request authentication decision.

use crate::gate::pipeline::{Flow, Stage};
use crate::gate::policy::{is_preflight, Access, RoutePolicy};
use crate::types::unauthenticated_response;
use axum::extract::Request;
use axum::http::{header, HeaderMap, Method};
use axum::response::Response;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tollgate_token::{Principal, TokenError, TokenVerifier};
use tracing::{debug, warn};

/// Why a request was turned away. Only ever logged; clients always see the
/// same 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] TokenError),
}

impl AuthFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthFailure::MissingCredential => "missing_credential",
            AuthFailure::InvalidToken(err) => err.kind(),
        }
    }
}

/// Result of [`AuthGate::intercept`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Let the request through, with a principal for protected routes.
    Forward(Option<Principal>),
    /// Stop here and answer 401.
    Reject(AuthFailure),
}

/// States a request passes through inside the gate.
///
/// `Start -> PolicyChecked -> PublicAllowed` or
/// `Start -> PolicyChecked -> CredentialExtracted -> Verified | Failed`.
/// Nothing here outlives the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStep {
    Start,
    PolicyChecked,
    PublicAllowed,
    CredentialExtracted,
    Verified,
    Failed,
}

impl Outcome {
    /// Last state reached before the terminal `Forwarded`/`Rejected`.
    pub fn step(&self) -> GateStep {
        match self {
            Outcome::Forward(None) => GateStep::PublicAllowed,
            Outcome::Forward(Some(_)) => GateStep::Verified,
            Outcome::Reject(AuthFailure::MissingCredential) => GateStep::PolicyChecked,
            Outcome::Reject(AuthFailure::InvalidToken(_)) => GateStep::Failed,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Outcome::Forward(_))
    }
}

/// The authentication gate.
///
/// Holds only immutable, shared state: the route policy and the token
/// verifier. Every call to [`intercept`](Self::intercept) is independent.
#[derive(Debug, Clone)]
pub struct AuthGate {
    policy: Arc<RoutePolicy>,
    verifier: Arc<TokenVerifier>,
    realm: String,
}

impl AuthGate {
    pub fn new(policy: RoutePolicy, verifier: Arc<TokenVerifier>, realm: impl Into<String>) -> Self {
        Self {
            policy: Arc::new(policy),
            verifier,
            realm: realm.into(),
        }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Decides whether a request may proceed.
    ///
    /// Preflight is checked before the route policy. For protected routes the
    /// token is only parsed once a bearer credential has been found. Each
    /// decision emits one tracing event carrying the final [`GateStep`].
    pub fn intercept(&self, method: &Method, path: &str, headers: &HeaderMap) -> Outcome {
        let mut token = None;
        let (outcome, reason) = if is_preflight(method) {
            (Outcome::Forward(None), "preflight")
        } else if self.policy.evaluate(method, path) == Access::Public {
            (Outcome::Forward(None), "public_route")
        } else {
            match bearer_token(headers) {
                None => (Outcome::Reject(AuthFailure::MissingCredential), "missing_credential"),
                Some(raw) => match self.verifier.verify(raw) {
                    Ok(principal) => (Outcome::Forward(Some(principal)), "authenticated"),
                    Err(err) => {
                        token = Some(fingerprint(raw));
                        let kind = err.kind();
                        (Outcome::Reject(AuthFailure::InvalidToken(err)), kind)
                    }
                },
            }
        };

        let step = outcome.step();
        match &outcome {
            Outcome::Forward(Some(principal)) => debug!(
                %method,
                path,
                step = ?step,
                kind = reason,
                subject = principal.subject(),
                "Authenticated request"
            ),
            Outcome::Forward(None) => {
                debug!(%method, path, step = ?step, kind = reason, "Request forwarded")
            }
            Outcome::Reject(AuthFailure::MissingCredential) => {
                debug!(%method, path, step = ?step, kind = reason, "Rejected request")
            }
            Outcome::Reject(AuthFailure::InvalidToken(err)) => warn!(
                %method,
                path,
                step = ?step,
                kind = reason,
                token = token.as_deref().unwrap_or_default(),
                "Rejected request: {}",
                err
            ),
        }

        outcome
    }

    /// The 401 answer for this gate's realm.
    pub fn challenge(&self) -> Response {
        unauthenticated_response(Some(&self.realm))
    }
}

impl Stage for AuthGate {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn apply(&self, mut req: Request) -> Flow {
        match self.intercept(req.method(), req.uri().path(), req.headers()) {
            Outcome::Forward(Some(principal)) => {
                req.extensions_mut().insert(principal);
                Flow::Continue(req)
            }
            Outcome::Forward(None) => {
                req.extensions_mut().remove::<Principal>();
                Flow::Continue(req)
            }
            Outcome::Reject(_) => Flow::Halt(self.challenge()),
        }
    }
}

/// Extracts the credential from `Authorization: Bearer <token>`.
///
/// Returns `None` when the header is absent, not visible ASCII, or uses a
/// different scheme. The scheme name is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, credential) = value.split_once(' ').unwrap_or((value, ""));

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(credential.trim())
}

/// Short SHA-256 prefix identifying a token in logs without revealing it.
pub fn fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    hex::encode(&digest[..6])
}
