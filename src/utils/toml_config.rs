//! TOML-based configuration for tollgate
//!
//! Everything the gate needs at startup comes from one file (`tollgate.toml`):
//! server binding and logging, token lifetime, the route allowlist, and the
//! user table for the issuance endpoint. Secrets are never written into the
//! file; it names the environment variable that holds them.
//!
//! Configuration is read once and is immutable for the process lifetime.
//! Rotating the signing secret requires a restart.

use crate::gate::policy::Access;
use crate::gate::pattern::PathPattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tollgate_token::MAX_TTL_SECS;

/// Minimum length of the HMAC signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Root configuration structure loaded from tollgate.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TollgateConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Origins allowed by the CORS layer. Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Token validity in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

fn default_jwt_secret_env() -> String {
    "TOLLGATE_JWT_SECRET".to_string()
}

fn default_token_ttl() -> i64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

// ============= Gate Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Realm advertised in the `WWW-Authenticate` challenge
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Ordered route rules, first match wins. The token endpoint and CORS
    /// preflight are always public regardless of this list.
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteRuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRuleConfig {
    /// HTTP method; any method when absent
    #[serde(default)]
    pub method: Option<String>,

    /// Ant-style path pattern (`*`, `?`, `**`)
    pub pattern: String,

    #[serde(default = "default_access")]
    pub access: Access,
}

impl RouteRuleConfig {
    pub fn public(method: Option<&str>, pattern: &str) -> Self {
        Self {
            method: method.map(str::to_string),
            pattern: pattern.to_string(),
            access: Access::Public,
        }
    }
}

fn default_realm() -> String {
    "tollgate".to_string()
}

fn default_access() -> Access {
    Access::Public
}

fn default_routes() -> Vec<RouteRuleConfig> {
    [
        "/api-docs",
        "/api-docs/**",
        "/swagger-resources/**",
        "/swagger-ui.html**",
        "/swagger-ui/**",
        "/webjars/**",
        "/favicon.ico",
        "/health",
    ]
    .into_iter()
    .map(|pattern| RouteRuleConfig::public(Some("GET"), pattern))
    .collect()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            routes: default_routes(),
        }
    }
}

// ============= Credentials Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// Argon2id cost parameters used when hashing new passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    #[serde(default = "default_iterations")]
    pub iterations: u32,

    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    argon2::Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    argon2::Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    argon2::Params::DEFAULT_P_COST
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl HashingConfig {
    pub fn params(&self) -> Result<argon2::Params, ConfigError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| ConfigError::ValidationError(format!("Invalid hashing parameters: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,

    /// PHC-formatted Argon2 hash (see `tollgate-server hash-password`)
    pub password_hash: String,

    #[serde(default)]
    pub authorities: Vec<String>,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Signing secret in '{0}' is too short: need at least {1} bytes")]
    WeakSecret(String, usize),

    #[error("Invalid route rule '{0}': {1}")]
    InvalidRoute(String, String),

    #[error("Invalid password hash for user '{0}': {1}")]
    InvalidPasswordHash(String, String),
}

impl TollgateConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_unchecked(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration without validating it. Used by CLI commands that do
    /// not need the signing secret.
    pub fn load_unchecked<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration, including the signing secret in the environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt_secret()?;
        self.validate_static()
    }

    /// Validate everything that does not depend on the environment
    pub fn validate_static(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_ttl_secs must be positive, got {}",
                self.auth.token_ttl_secs
            )));
        }
        if self.auth.token_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_ttl_secs must be at most {}, got {}",
                MAX_TTL_SECS, self.auth.token_ttl_secs
            )));
        }

        if self.gate.realm.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gate.realm must not be empty".to_string(),
            ));
        }

        for rule in &self.gate.routes {
            if let Some(ref method) = rule.method {
                crate::gate::policy::parse_method(method)
                    .map_err(|e| ConfigError::InvalidRoute(rule.pattern.clone(), e))?;
            }
            PathPattern::parse(&rule.pattern)
                .map_err(|e| ConfigError::InvalidRoute(rule.pattern.clone(), e.to_string()))?;
        }

        self.credentials.hashing.params()?;

        let mut seen = HashSet::new();
        for user in &self.credentials.users {
            if user.username.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "credentials.users entries need a username".to_string(),
                ));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate user '{}' in credentials.users",
                    user.username
                )));
            }
            argon2::PasswordHash::new(&user.password_hash)
                .map_err(|e| ConfigError::InvalidPasswordHash(user.username.clone(), e.to_string()))?;
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the JWT signing secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let secret = self
            .resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))?;

        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret(
                self.auth.jwt_secret_env.clone(),
                MIN_SECRET_BYTES,
            ));
        }

        Ok(secret)
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-formed PHC string; not the hash of any real password.
    const SAMPLE_HASH: &str =
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$Y2hlY2tzdW1jaGVja3N1bWNoZWNrc3VtY2hlY2s";

    fn create_test_config(secret_env: &str) -> String {
        format!(
            r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"
log_format = "json"

[auth]
jwt_secret_env = "{secret_env}"
token_ttl_secs = 900

[gate]
realm = "test-realm"

[[gate.routes]]
method = "GET"
pattern = "/api-docs/internal/**"
access = "protected"

[[gate.routes]]
method = "GET"
pattern = "/api-docs/**"

[[gate.routes]]
pattern = "/public/*"

[credentials.hashing]
iterations = 3

[[credentials.users]]
username = "admin"
password_hash = "{SAMPLE_HASH}"
authorities = ["ROLE_ADMIN", "ROLE_USER"]
"#
        )
    }

    #[test]
    fn test_parse_config() {
        let config = TollgateConfig::from_toml(&create_test_config("TEST_PARSE_SECRET"))
            .expect("Failed to parse config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.auth.token_ttl_secs, 900);
        assert_eq!(config.gate.realm, "test-realm");
        assert_eq!(config.gate.routes.len(), 3);
        assert_eq!(config.gate.routes[0].access, Access::Protected);
        assert_eq!(config.gate.routes[1].access, Access::Public);
        assert_eq!(config.gate.routes[2].method, None);
        assert_eq!(config.credentials.hashing.iterations, 3);
        assert_eq!(config.credentials.users[0].authorities.len(), 2);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults() {
        let config = TollgateConfig::from_toml("").unwrap();

        // Server defaults
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert!(config.server.cors_allowed_origins.is_empty());

        // Auth defaults
        assert_eq!(config.auth.jwt_secret_env, "TOLLGATE_JWT_SECRET");
        assert_eq!(config.auth.token_ttl_secs, 3600);

        // Gate defaults
        assert_eq!(config.gate.realm, "tollgate");
        assert!(config
            .gate
            .routes
            .iter()
            .any(|r| r.pattern == "/api-docs/**" && r.access == Access::Public));
        assert!(config.gate.routes.iter().any(|r| r.pattern == "/health"));

        // Credentials defaults
        assert_eq!(config.credentials.hashing, HashingConfig::default());
        assert!(config.credentials.users.is_empty());
    }

    #[test]
    fn test_validate_accepts_good_config() {
        std::env::set_var("TEST_VALID_SECRET", "test-secret-at-least-32-characters-long");
        let config = TollgateConfig::from_toml(&create_test_config("TEST_VALID_SECRET")).unwrap();
        config.validate().expect("config should validate");
    }

    #[test]
    fn test_missing_secret_env() {
        let config =
            TollgateConfig::from_toml(&create_test_config("TEST_SECRET_THAT_IS_NEVER_SET")).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingEnvVar(name)) if name == "TEST_SECRET_THAT_IS_NEVER_SET"
        ));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        std::env::set_var("TEST_SHORT_SECRET", "too-short");
        let config = TollgateConfig::from_toml(&create_test_config("TEST_SHORT_SECRET")).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeakSecret(_, MIN_SECRET_BYTES))
        ));
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        let mut config = TollgateConfig::default();
        config.auth.token_ttl_secs = 0;
        assert!(matches!(
            config.validate_static(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_ttl_above_ten_years_is_rejected() {
        let config = TollgateConfig::from_toml("[auth]\ntoken_ttl_secs = 9223372036854775807")
            .unwrap();
        assert!(matches!(
            config.validate_static(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = TollgateConfig::default();
        config.auth.token_ttl_secs = MAX_TTL_SECS;
        assert!(config.validate_static().is_ok());
    }

    #[test]
    fn test_bad_route_pattern_is_rejected() {
        let mut config = TollgateConfig::default();
        config
            .gate
            .routes
            .push(RouteRuleConfig::public(None, "no-leading-slash"));
        assert!(matches!(
            config.validate_static(),
            Err(ConfigError::InvalidRoute(pattern, _)) if pattern == "no-leading-slash"
        ));
    }

    #[test]
    fn test_bad_route_method_is_rejected() {
        let mut config = TollgateConfig::default();
        config
            .gate
            .routes
            .push(RouteRuleConfig::public(Some("GE T"), "/x"));
        assert!(matches!(
            config.validate_static(),
            Err(ConfigError::InvalidRoute(_, _))
        ));
    }

    #[test]
    fn test_bad_password_hash_is_rejected() {
        let mut config = TollgateConfig::default();
        config.credentials.users.push(UserConfig {
            username: "bob".into(),
            password_hash: "plaintext-password".into(),
            authorities: vec![],
        });
        assert!(matches!(
            config.validate_static(),
            Err(ConfigError::InvalidPasswordHash(user, _)) if user == "bob"
        ));
    }

    #[test]
    fn test_duplicate_users_are_rejected() {
        let mut config = TollgateConfig::default();
        let user = UserConfig {
            username: "bob".into(),
            password_hash: SAMPLE_HASH.into(),
            authorities: vec![],
        };
        config.credentials.users = vec![user.clone(), user];
        assert!(matches!(
            config.validate_static(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bad_hashing_params_are_rejected() {
        let mut config = TollgateConfig::default();
        config.credentials.hashing.parallelism = 0;
        assert!(config.validate_static().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = TollgateConfig::load("/definitely/not/here/tollgate.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        std::env::set_var("TEST_FILE_SECRET", "test-secret-at-least-32-characters-long");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tollgate.toml");
        fs::write(&path, create_test_config("TEST_FILE_SECRET")).unwrap();

        let config = TollgateConfig::load(&path).expect("should load");
        assert_eq!(config.gate.realm, "test-realm");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TollgateConfig::from_toml("[server\nport = 1"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
