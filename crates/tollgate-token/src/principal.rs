//! The authenticated identity resolved from a valid token.

use serde::{Deserialize, Serialize};

/// Authenticated identity and its authorities.
///
/// A principal lives for the duration of one request. It is rebuilt from the
/// token on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    subject: String,
    authorities: Vec<String>,
}

impl Principal {
    /// Creates a principal for `subject` holding `authorities`.
    pub fn new(subject: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            authorities,
        }
    }

    /// The subject identifier carried in the token's `sub` claim.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Authorities in the order they were issued.
    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    /// Returns true if the principal holds `authority`.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Returns true if the principal holds at least one of `required`.
    ///
    /// An empty requirement is never satisfied.
    pub fn has_any(&self, required: &[&str]) -> bool {
        required.iter().any(|r| self.has_authority(r))
    }

    /// Returns true if the principal holds every authority in `required`.
    ///
    /// An empty requirement is always satisfied.
    pub fn has_all(&self, required: &[&str]) -> bool {
        required.iter().all(|r| self.has_authority(r))
    }
}
