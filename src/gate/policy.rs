//! Route policy: which requests need a token.

use crate::gate::pattern::{PathPattern, PatternError};
use crate::utils::toml_config::{ConfigError, GateConfig};
use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Path of the token issuance endpoint. Always public.
pub const TOKEN_PATH: &str = "/api/token";

/// Decision for one request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
}

/// One `(method, pattern) -> access` entry. A rule without a method applies
/// to every method.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: Option<Method>,
    pub pattern: PathPattern,
    pub access: Access,
}

impl RouteRule {
    pub fn new(method: Option<Method>, pattern: &str, access: Access) -> Result<Self, PatternError> {
        Ok(Self {
            method,
            pattern: PathPattern::parse(pattern)?,
            access,
        })
    }

    pub fn public(method: Option<Method>, pattern: &str) -> Result<Self, PatternError> {
        Self::new(method, pattern, Access::Public)
    }

    pub fn protected(method: Option<Method>, pattern: &str) -> Result<Self, PatternError> {
        Self::new(method, pattern, Access::Protected)
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

/// Ordered rule list, evaluated first-match-wins. Requests no rule matches
/// are [`Access::Protected`].
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
}

impl RoutePolicy {
    /// A policy with only the given rules.
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Builds the policy from configuration. The issuance rule comes first so
    /// no configured rule can shadow it.
    pub fn from_config(config: &GateConfig) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(config.routes.len() + 1);
        rules.push(
            RouteRule::public(None, TOKEN_PATH)
                .map_err(|e| ConfigError::InvalidRoute(TOKEN_PATH.to_string(), e.to_string()))?,
        );

        for rule in &config.routes {
            let invalid = |reason: String| ConfigError::InvalidRoute(rule.pattern.clone(), reason);
            let method = rule
                .method
                .as_deref()
                .map(parse_method)
                .transpose()
                .map_err(invalid)?;
            let compiled = RouteRule::new(method, &rule.pattern, rule.access)
                .map_err(|e| invalid(e.to_string()))?;
            rules.push(compiled);
        }

        Ok(Self { rules })
    }

    /// Adds a rule at the end of the list.
    pub fn with_rule(mut self, rule: RouteRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Decides one request. Total over all inputs.
    pub fn evaluate(&self, method: &Method, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| rule.access)
            .unwrap_or(Access::Protected)
    }
}

/// CORS preflight requests never carry credentials.
pub fn is_preflight(method: &Method) -> bool {
    method == Method::OPTIONS
}

/// Parses a configured method name, case-insensitively.
pub fn parse_method(raw: &str) -> Result<Method, String> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method '{}'", raw))
}
