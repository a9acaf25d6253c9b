//! CLI Integration Tests for tollgate
//!
//! Runs the built tollgate-server binary for the subcommands that do not
//! start a server.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run tollgate-server with arguments
fn run_tollgate(args: &[&str], envs: &[(&str, &str)]) -> std::process::Output {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tollgate-server"));
    cmd.args(args).current_dir(dir.path()).env_remove("RUST_LOG");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute command")
}

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("tollgate.toml");
    fs::write(&path, content).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_tollgate(&["--help"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("tollgate"));
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("hash-password"));
    assert!(stdout.contains("generate-secret"));
    assert!(stdout.contains("issue-token"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let output = run_tollgate(&["--version"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tollgate-server"));
}

// =============================================================================
// Secret and Password Tests
// =============================================================================

#[test]
fn test_generate_secret() {
    let output = run_tollgate(&["generate-secret", "--bytes", "32"], &[]);

    assert!(output.status.success());
    let secret = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(secret.len(), 64);
    assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_generate_secret_rejects_short_length() {
    let output = run_tollgate(&["generate-secret", "--bytes", "8"], &[]);
    assert!(!output.status.success());
}

#[test]
fn test_hash_password() {
    let output = run_tollgate(
        &[
            "hash-password",
            "hunter2",
            "--memory-kib",
            "256",
            "--iterations",
            "1",
            "--parallelism",
            "1",
        ],
        &[],
    );

    assert!(output.status.success());
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert!(hash.starts_with("$argon2id$v=19$m=256,t=1,p=1$"));
}

// =============================================================================
// Config-Dependent Tests
// =============================================================================

#[test]
fn test_issue_token() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[auth]
jwt_secret_env = "TOLLGATE_CLI_TEST_SECRET"
"#,
    );

    let output = run_tollgate(
        &["--config", &config, "issue-token", "alice", "-a", "ROLE_USER"],
        &[("TOLLGATE_CLI_TEST_SECRET", "cli-integration-secret-32-bytes-min")],
    );

    assert!(output.status.success());
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_issue_token_without_secret_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[auth]
jwt_secret_env = "TOLLGATE_CLI_TEST_SECRET_NOT_SET"
"#,
    );

    let output = run_tollgate(&["--config", &config, "issue-token", "alice"], &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TOLLGATE_CLI_TEST_SECRET_NOT_SET"));
}

#[test]
fn test_config_command_shows_summary() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[server]
port = 4100

[gate]
realm = "cli-realm"
"#,
    );

    let output = run_tollgate(&["--no-color", "--config", &config, "config"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("127.0.0.1:4100"));
    assert!(stdout.contains("cli-realm"));
    assert!(stdout.contains("/api/token"));
}

#[test]
fn test_config_validate_fails_without_secret() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[auth]
jwt_secret_env = "TOLLGATE_CLI_VALIDATE_NOT_SET"
"#,
    );

    let output = run_tollgate(&["--config", &config, "config", "--validate"], &[]);
    assert!(!output.status.success());
}

#[test]
fn test_serve_without_config_fails() {
    let output = run_tollgate(&["--config", "/nonexistent/tollgate.toml"], &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}
