use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("storeadmin")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("orders"))
        .stdout(predicate::str::contains("inventory"))
        .stdout(predicate::str::contains("staff"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_orders_help_shows_subcommands() {
    cargo_bin_cmd!("storeadmin")
        .args(["orders", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set-status"));
}

#[test]
fn test_unknown_status_is_rejected_by_parser() {
    cargo_bin_cmd!("storeadmin")
        .args(["orders", "set-status", "12", "shipped"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shipped"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("storeadmin")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
