//! Commands that talk to a mocked backend.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-cli";

fn store_token(home: &Path) {
    fs::write(
        home.join("credentials.json"),
        json!({"store_admin_token": TOKEN}).to_string(),
    )
    .unwrap();
}

fn stored_credentials(home: &Path) -> Option<Value> {
    let raw = fs::read_to_string(home.join("credentials.json")).ok()?;
    serde_json::from_str(&raw).ok()
}

async fn mock_current_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/store-admin/user"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": 3,
                "name": "Amina",
                "email": "amina@shop.test",
                "store": {"name": "Corner Shop"}
            }
        })))
        .mount(server)
        .await;
}

fn signed_in_home() -> TempDir {
    let home = tempdir().unwrap();
    store_token(home.path());
    home
}

#[test]
fn test_whoami_without_credential_fails() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", "http://127.0.0.1:9")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_logout_without_session() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored session."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/store-admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "user": {"id": 3, "name": "Amina", "email": "amina@shop.test"},
                "token": TOKEN
            }
        })))
        .mount(&server)
        .await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .env("STOREADMIN_PASSWORD", "secret")
        .args(["login", "--email", "amina@shop.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Logged in as Amina <amina@shop.test>",
        ));

    let stored = stored_credentials(home.path()).unwrap();
    assert_eq!(stored["store_admin_token"], TOKEN);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_lists_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/store-admin/login"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "message": "The given data was invalid.",
            "errors": {"email": ["The email field must be a valid email address."]}
        })))
        .mount(&server)
        .await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .env("STOREADMIN_PASSWORD", "secret")
        .args(["login", "--email", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "email: The email field must be a valid email address.",
        ));

    assert!(stored_credentials(home.path()).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_shows_store() {
    let server = MockServer::start().await;
    mock_current_user(&server).await;
    let home = signed_in_home();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Amina"))
        .stdout(predicate::str::contains("Store: Corner Shop"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_credential_is_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store-admin/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})),
        )
        .mount(&server)
        .await;
    let home = signed_in_home();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"))
        .stdout(predicate::str::contains("Start screen: Sign in"));

    let token = stored_credentials(home.path()).and_then(|c| c.get("store_admin_token").cloned());
    assert!(token.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_orders_list_filters_by_status() {
    let server = MockServer::start().await;
    mock_current_user(&server).await;
    Mock::given(method("GET"))
        .and(path("/store-admin/orders"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"data": [
                {"id": 1, "order_number": "ORD-1001", "customer_name": "Bola",
                 "status": "pending", "amount": "1240.00"},
                {"id": 2, "order_number": "ORD-1002", "customer_name": "Chidi",
                 "status": "delivered", "amount": 15}
            ]}
        })))
        .mount(&server)
        .await;
    let home = signed_in_home();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .args(["orders", "list", "--status", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ORD-1001"))
        .stdout(predicate::str::contains("$1,240.00"))
        .stdout(predicate::str::contains("ORD-1002").not())
        .stdout(predicate::str::contains("1 order(s)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_stock_prints_confirmation() {
    let server = MockServer::start().await;
    mock_current_user(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/store-admin/products/9/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Stock updated"
        })))
        .mount(&server)
        .await;
    let home = signed_in_home();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .args(["inventory", "set-stock", "9", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stock updated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_staff_list_counts_active_members() {
    let server = MockServer::start().await;
    mock_current_user(&server).await;
    Mock::given(method("GET"))
        .and(path("/store-admin/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Dayo", "role": "Cashier",
                 "access": "POS ACCESS", "status": "ACTIVE"},
                {"id": 2, "name": "Efe", "role": "Manager",
                 "access": "FULL ADMIN", "status": "INACTIVE"}
            ]
        })))
        .mount(&server)
        .await;
    let home = signed_in_home();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .env("STOREADMIN_BASE_URL", server.uri())
        .args(["staff", "list", "--filter", "cash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dayo"))
        .stdout(predicate::str::contains("Efe").not())
        .stdout(predicate::str::contains("1 active of 2"));
}

#[test]
fn test_empty_profile_update_is_rejected() {
    let home = signed_in_home();

    cargo_bin_cmd!("storeadmin")
        .env("STOREADMIN_HOME", home.path())
        .args(["profile", "update"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}
