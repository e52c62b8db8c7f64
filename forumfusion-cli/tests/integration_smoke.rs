//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn forumfusion() -> Command {
    let mut cmd = Command::cargo_bin("forumfusion").unwrap();
    cmd.env_remove("DATABASE_URL")
        .env_remove("TOKEN_SECRET")
        .env_remove("PORT")
        .env_remove("APP_ENV")
        .env_remove("CORS_ORIGINS")
        .env_remove("STRIPE_SECRET_KEY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    forumfusion()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_version() {
    forumfusion()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_serve_help() {
    forumfusion()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-migrations"))
        .stdout(predicate::str::contains("--cors-origin"));
}

#[test]
fn test_migrate_help() {
    forumfusion()
        .arg("migrate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database URL"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "token_secret = \"secret\"\n").unwrap();

    forumfusion()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("database_url"));
}

#[test]
fn test_serve_without_token_secret_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "database_url = \"postgres://localhost/forumfusion\"\n").unwrap();

    forumfusion()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("token_secret"));
}

#[test]
fn test_missing_config_file_fails() {
    forumfusion()
        .arg("--config")
        .arg("/nonexistent/forumfusion.toml")
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
