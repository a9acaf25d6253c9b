//! Error types for tollgate-token.

use thiserror::Error;

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Errors produced while issuing or verifying tokens.
///
/// Every verification failure has its own variant so callers can log the
/// exact cause while still answering clients uniformly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The raw string could not be parsed as a token.
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// The signature does not match the server secret.
    #[error("Token signature mismatch")]
    Signature,

    /// The current time is at or past the token's expiry.
    #[error("Token expired")]
    Expired,

    /// The token claims to have been issued after the current time.
    #[error("Token not yet valid")]
    NotYetValid,

    /// The token could not be built on the issuance path.
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    /// The verifier was constructed with unusable settings.
    #[error("Invalid verifier configuration: {0}")]
    Config(String),
}

impl TokenError {
    /// Stable, low-cardinality label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed(_) => "malformed_token",
            TokenError::Signature => "signature_mismatch",
            TokenError::Expired => "expired_token",
            TokenError::NotYetValid => "token_not_yet_valid",
            TokenError::Encoding(_) => "encoding_error",
            TokenError::Config(_) => "config_error",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Signature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
