//! Token issuance and verification.

use crate::claims::{Claims, Token};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TokenError};
use crate::principal::Principal;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

/// Longest accepted token lifetime: ten years.
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Issues and verifies HS256 tokens.
///
/// The verifier owns the signing secret (as derived keys) and the TTL. It keeps
/// no per-token state, so a single instance can be shared behind an `Arc`
/// across every request handler.
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    /// Creates a verifier from the raw signing secret and token lifetime.
    ///
    /// # Arguments
    /// * `secret` - HMAC secret; must not be empty
    /// * `ttl_secs` - Token validity in seconds; in `1..=MAX_TTL_SECS`
    pub fn new(secret: &[u8], ttl_secs: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(TokenError::Config("signing secret is empty".to_string()));
        }
        if ttl_secs <= 0 {
            return Err(TokenError::Config(format!(
                "token TTL must be positive, got {}",
                ttl_secs
            )));
        }
        if ttl_secs > MAX_TTL_SECS {
            return Err(TokenError::Config(format!(
                "token TTL must be at most {} seconds, got {}",
                MAX_TTL_SECS, ttl_secs
            )));
        }

        // Expiry is checked against our own clock below, with an exclusive bound.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Builds a signed token for `subject` carrying `authorities`.
    ///
    /// `iat` is the current clock reading and `exp` is `iat + ttl`.
    pub fn issue(&self, subject: &str, authorities: &[String]) -> Result<Token> {
        if subject.trim().is_empty() {
            return Err(TokenError::Encoding("subject must not be empty".to_string()));
        }

        let now = self.clock.now();
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| TokenError::Encoding(format!("expiry overflows at iat {}", now)))?;
        let claims = Claims {
            sub: subject.to_string(),
            authorities: authorities.to_vec(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(Token {
            value,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    /// Verifies `raw` and returns the principal it names.
    ///
    /// Checks, in order: structure, signature, `iat <= now`, `now < exp`.
    pub fn verify(&self, raw: &str) -> Result<Principal> {
        self.verify_claims(raw)
            .map(|claims| Principal::new(claims.sub, claims.authorities))
    }

    /// Verifies `raw` and returns its full claim set.
    pub fn verify_claims(&self, raw: &str) -> Result<Claims> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenError::Malformed("empty token".to_string()));
        }

        let claims = decode::<Claims>(raw, &self.decoding_key, &self.validation)?.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed("empty subject".to_string()));
        }

        let now = self.clock.now();
        if claims.iat > now {
            return Err(TokenError::NotYetValid);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
