//! JWT claim set carried by every token.

use serde::{Deserialize, Serialize};

/// Claims embedded in a token. The whole authorization state travels here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier.
    pub sub: String,
    /// Authorities granted at issuance.
    pub authorities: Vec<String>,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds. The token is invalid from this instant on.
    pub exp: i64,
    /// Random token id, only used to correlate log lines.
    pub jti: String,
}

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Compact JWS serialization, ready for an `Authorization: Bearer` header.
    pub value: String,
    /// Issued-at, unix seconds.
    pub issued_at: i64,
    /// Expiry, unix seconds.
    pub expires_at: i64,
}

impl Token {
    /// The compact token string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Lifetime in seconds.
    pub fn ttl(&self) -> i64 {
        self.expires_at - self.issued_at
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
