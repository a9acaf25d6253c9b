use crate::utils::toml_config::{ConfigError, CredentialsConfig, HashingConfig};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Version,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Errors from the credential check on the issuance path.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Unknown identifier or wrong secret. The two are deliberately
    /// indistinguishable.
    #[error("Authentication failure")]
    AuthenticationFailure,

    #[error("Credential store error: {0}")]
    Store(String),
}

/// Checks a user-supplied secret and returns the user's authorities.
///
/// Only the token issuance endpoint calls this; verifying a token never does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Vec<String>, CredentialError>;
}

/// Hashes a password using Argon2id with the configured cost.
///
/// Returns a PHC-formatted hash string.
pub fn hash_password(password: &str, hashing: &HashingConfig) -> Result<String, CredentialError> {
    let params = hashing
        .params()
        .map_err(|e| CredentialError::Store(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Store(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a PHC hash. The cost parameters come from the
/// hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| CredentialError::Store(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Debug, Clone)]
struct StoredUser {
    password_hash: String,
    authorities: Vec<String>,
}

/// User table loaded from `[[credentials.users]]`.
#[derive(Clone)]
pub struct Argon2CredentialStore {
    users: Arc<HashMap<String, StoredUser>>,
    // Checked for unknown users so both failure paths cost one Argon2 run.
    dummy_hash: Arc<str>,
}

impl Argon2CredentialStore {
    pub fn from_config(config: &CredentialsConfig) -> Result<Self, ConfigError> {
        let mut users = HashMap::with_capacity(config.users.len());

        for user in &config.users {
            PasswordHash::new(&user.password_hash).map_err(|e| {
                ConfigError::InvalidPasswordHash(user.username.clone(), e.to_string())
            })?;
            users.insert(
                user.username.clone(),
                StoredUser {
                    password_hash: user.password_hash.clone(),
                    authorities: user.authorities.clone(),
                },
            );
        }

        let dummy_hash = hash_password("tollgate-dummy-password", &config.hashing)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(Self {
            users: Arc::new(users),
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.users.contains_key(identifier)
    }
}

impl std::fmt::Debug for Argon2CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2CredentialStore")
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialVerifier for Argon2CredentialStore {
    async fn verify_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Vec<String>, CredentialError> {
        let user = self.users.get(identifier).cloned();
        let hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.to_string());
        let secret = secret.to_string();

        // Argon2 is deliberately slow; keep it off the async workers.
        let matched = tokio::task::spawn_blocking(move || verify_password(&secret, &hash))
            .await
            .map_err(|e| CredentialError::Store(format!("Verification task failed: {}", e)))??;

        match user {
            Some(user) if matched => Ok(user.authorities),
            _ => Err(CredentialError::AuthenticationFailure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::UserConfig;

    fn cheap_hashing() -> HashingConfig {
        HashingConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn store() -> Argon2CredentialStore {
        let hashing = cheap_hashing();
        let config = CredentialsConfig {
            hashing,
            users: vec![
                UserConfig {
                    username: "admin".into(),
                    password_hash: hash_password("admin-password", &hashing).unwrap(),
                    authorities: vec!["ROLE_ADMIN".into(), "ROLE_USER".into()],
                },
                UserConfig {
                    username: "alice".into(),
                    password_hash: hash_password("alice-password", &hashing).unwrap(),
                    authorities: vec!["ROLE_USER".into()],
                },
            ],
        };
        Argon2CredentialStore::from_config(&config).expect("store should build")
    }

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";
        let hash = hash_password(password, &cheap_hashing()).expect("should hash password");

        // Hash should not equal the original password
        assert_ne!(hash, password);

        // Hash should be in PHC format with the configured cost
        assert!(hash.starts_with("$argon2id$"), "hash should be in PHC format");
        assert!(hash.contains("m=256,t=1,p=1"), "hash should carry the configured cost");
    }

    #[test]
    fn test_password_verification() {
        let hash = hash_password("secure_password_456", &cheap_hashing()).unwrap();

        assert!(verify_password("secure_password_456", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_invalid_hash() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(CredentialError::Store(_))
        ));
    }

    #[test]
    fn test_hash_rejects_bad_params() {
        let hashing = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        };
        assert!(hash_password("x", &hashing).is_err());
    }

    #[tokio::test]
    async fn test_store_returns_authorities() {
        let authorities = store()
            .verify_credentials("admin", "admin-password")
            .await
            .expect("should authenticate");
        assert_eq!(authorities, vec!["ROLE_ADMIN", "ROLE_USER"]);
    }

    #[tokio::test]
    async fn test_store_wrong_password() {
        let result = store().verify_credentials("alice", "admin-password").await;
        assert!(matches!(result, Err(CredentialError::AuthenticationFailure)));
    }

    #[tokio::test]
    async fn test_store_unknown_user() {
        let result = store().verify_credentials("mallory", "anything").await;
        assert!(matches!(result, Err(CredentialError::AuthenticationFailure)));
    }

    #[tokio::test]
    async fn test_store_unknown_user_with_dummy_password() {
        let result = store()
            .verify_credentials("mallory", "tollgate-dummy-password")
            .await;
        assert!(matches!(result, Err(CredentialError::AuthenticationFailure)));
    }

    #[test]
    fn test_store_rejects_plaintext_hash() {
        let config = CredentialsConfig {
            hashing: cheap_hashing(),
            users: vec![UserConfig {
                username: "bob".into(),
                password_hash: "hunter2".into(),
                authorities: vec![],
            }],
        };
        assert!(matches!(
            Argon2CredentialStore::from_config(&config),
            Err(ConfigError::InvalidPasswordHash(user, _)) if user == "bob"
        ));
    }

    #[test]
    fn test_store_lookup_helpers() {
        let store = store();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert!(store.contains("alice"));
        assert!(!store.contains("mallory"));
        assert!(!format!("{:?}", store).contains("argon2"));
    }
}
