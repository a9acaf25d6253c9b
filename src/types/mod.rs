use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use crate::auth::credentials::CredentialError;
use tollgate_token::{Principal, TokenError};
use utoipa::ToSchema;

// ============= Token Issuance Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

// ============= Principal Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrincipalResponse {
    pub subject: String,
    pub authorities: Vec<String>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            subject: principal.subject().to_string(),
            authorities: principal.authorities().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// ============= Error Types =============

/// Body text of every authentication failure. Carries no detail on purpose.
pub const UNAUTHENTICATED: &str = "unauthenticated";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(_) | TokenError::Config(_) => AppError::Internal(err.to_string()),
            _ => AppError::Unauthenticated,
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::AuthenticationFailure => AppError::Unauthenticated,
            CredentialError::Store(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => unauthenticated_response(None),
            AppError::Forbidden(msg) => {
                tracing::debug!(reason = %msg, "Request forbidden");
                error_response(StatusCode::FORBIDDEN, "forbidden")
            }
            AppError::InvalidInput(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorResponse {
        error: message.to_string(),
    };
    (status, axum::Json(body)).into_response()
}

/// Builds the uniform 401 answer: a bearer challenge, a fixed body and no
/// session artifact of any kind.
pub fn unauthenticated_response(realm: Option<&str>) -> Response {
    let challenge = match realm {
        Some(realm) => format!("Bearer realm=\"{}\"", realm.replace('"', "")),
        None => "Bearer".to_string(),
    };

    let mut response = error_response(StatusCode::UNAUTHORIZED, UNAUTHENTICATED);
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&challenge) {
        headers.insert(header::WWW_AUTHENTICATE, value);
    } else {
        headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_response_shape() {
        let response = unauthenticated_response(Some("tollgate"));

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer realm=\"tollgate\""
        );
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn test_realm_quotes_are_stripped() {
        let response = unauthenticated_response(Some("a\"b"));
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer realm=\"ab\""
        );
    }

    #[test]
    fn test_token_errors_map_to_unauthenticated() {
        for err in [
            TokenError::Malformed("x".into()),
            TokenError::Signature,
            TokenError::Expired,
            TokenError::NotYetValid,
        ] {
            assert!(matches!(AppError::from(err), AppError::Unauthenticated));
        }
        assert!(matches!(
            AppError::from(TokenError::Encoding("x".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_credential_errors() {
        assert!(matches!(
            AppError::from(CredentialError::AuthenticationFailure),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            AppError::from(CredentialError::Store("down".into())),
            AppError::Internal(msg) if msg == "down"
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Forbidden("x".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidInput("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
