//! Subcommand implementations.

use crate::auth::credentials::hash_password;
use crate::cli::output::Output;
use crate::gate::policy::{Access, TOKEN_PATH};
use crate::utils::toml_config::{ConfigError, HashingConfig, TollgateConfig};
use crate::{build_verifier, AppState};
use anyhow::Context;
use rand::RngCore;
use std::path::Path;

/// Starts the HTTP server and runs until Ctrl-C.
pub async fn serve(config: TollgateConfig, output: &Output) -> anyhow::Result<()> {
    let address = config.bind_address();
    let state = AppState::from_config(config).context("Failed to initialize application state")?;
    let app = crate::app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    output.banner(&address);
    tracing::info!("tollgate listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Argon2 cost for `hash-password`: the config file's `[credentials.hashing]`
/// when the file exists, then any explicit overrides.
pub fn resolve_hashing(
    config_path: &Path,
    memory_kib: Option<u32>,
    iterations: Option<u32>,
    parallelism: Option<u32>,
) -> Result<HashingConfig, ConfigError> {
    let mut hashing = if config_path.exists() {
        TollgateConfig::load_unchecked(config_path)?.credentials.hashing
    } else {
        HashingConfig::default()
    };

    if let Some(m) = memory_kib {
        hashing.memory_kib = m;
    }
    if let Some(t) = iterations {
        hashing.iterations = t;
    }
    if let Some(p) = parallelism {
        hashing.parallelism = p;
    }

    hashing.params()?;
    Ok(hashing)
}

/// `hash-password`
pub fn hash_password_command(
    config_path: &Path,
    password: &str,
    memory_kib: Option<u32>,
    iterations: Option<u32>,
    parallelism: Option<u32>,
    verbose: bool,
    output: &Output,
) -> anyhow::Result<()> {
    let hashing = resolve_hashing(config_path, memory_kib, iterations, parallelism)?;
    let hash = hash_password(password, &hashing)?;

    if verbose {
        output.info(&format!(
            "Argon2id m={} t={} p={}",
            hashing.memory_kib, hashing.iterations, hashing.parallelism
        ));
    }
    output.value(&hash);
    Ok(())
}

/// Random signing secret, hex encoded.
pub fn generate_secret(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// `generate-secret`
pub fn generate_secret_command(bytes: u16, config: &TollgateConfig, verbose: bool, output: &Output) {
    if verbose {
        output.info(&format!(
            "{} random bytes; export as {}",
            bytes, config.auth.jwt_secret_env
        ));
    }
    output.value(&generate_secret(bytes as usize));
}

/// `issue-token`
pub fn issue_token_command(
    config_path: &Path,
    subject: &str,
    authorities: &[String],
    verbose: bool,
    output: &Output,
) -> anyhow::Result<()> {
    let config = TollgateConfig::load_unchecked(config_path)?;
    config.validate_static()?;
    let verifier = build_verifier(&config)?;
    let token = verifier.issue(subject, authorities)?;

    if verbose {
        output.info(&format!(
            "Issued to {} with [{}], expires at {}",
            subject,
            authorities.join(", "),
            token.expires_at
        ));
    }
    output.value(token.as_str());
    Ok(())
}

/// `config`
pub fn config_command(config_path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = TollgateConfig::load_unchecked(config_path)?;

    output.header(&format!("Configuration: {}", config_path.display()));
    output.kv("Listen", &config.bind_address());
    output.kv("Log", &format!("{} ({:?})", config.server.log_level, config.server.log_format));
    output.kv(
        "CORS origins",
        &if config.server.cors_allowed_origins.is_empty() {
            "any".to_string()
        } else {
            config.server.cors_allowed_origins.join(", ")
        },
    );
    output.kv("Secret env", &config.auth.jwt_secret_env);
    output.kv("Token TTL", &format!("{}s", config.auth.token_ttl_secs));
    output.kv("Realm", &config.gate.realm);

    output.subheader("Routes (first match wins)");
    output.list_item(&format!("*      {} -> public", TOKEN_PATH));
    for rule in &config.gate.routes {
        let access = match rule.access {
            Access::Public => "public",
            Access::Protected => "protected",
        };
        output.list_item(&format!(
            "{:<6} {} -> {}",
            rule.method.as_deref().unwrap_or("*"),
            rule.pattern,
            access
        ));
    }
    output.list_item("OPTIONS on any path -> public; everything else -> protected");

    output.subheader("Users");
    if config.credentials.users.is_empty() {
        output.warning("No users configured; POST /api/token will always answer 401");
    }
    for user in &config.credentials.users {
        output.list_item(&format!("{} [{}]", user.username, user.authorities.join(", ")));
    }

    if validate {
        output.subheader("Validation");
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                return Err(e.into());
            }
        }
    } else {
        output.hint("Run with --validate to check the signing secret and user table");
    }

    Ok(())
}
