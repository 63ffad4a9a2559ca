use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config to"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("dashboard_period ="));
    assert!(contents.contains("[backend]"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "dashboard_period = \"yearly\"\n").unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", dir.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}

#[test]
fn test_set_base_url_keeps_template_comments() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", dir.path())
        .args(["config", "set-base-url", "https://admin.example.com/api/v1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend set to"));

    let contents = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("base_url = \"https://admin.example.com/api/v1\""));
    assert!(contents.contains("# Request timeout in seconds"));
}

#[test]
fn test_set_base_url_rejects_malformed_url() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", dir.path())
        .args(["config", "set-base-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid backend base URL"));
}
