//! End-to-end tests for the sonic binary
//!
//! Each test runs the compiled binary against a session directory under
//! `SONIC_HOME` and, where a command reaches the network, a mock CDN.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use sonic_core::SessionStore;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sonic(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("sonic").unwrap();
    cmd.env("SONIC_HOME", home);
    cmd
}

fn envelope(inner: serde_json::Value) -> serde_json::Value {
    json!({ "response": inner })
}

fn connect(home: &std::path::Path, url: &str) {
    SessionStore::at(home).save_connection(url).unwrap();
}

fn log_in(home: &std::path::Path, url: &str) {
    let store = SessionStore::at(home);
    store.save_connection(url).unwrap();
    store
        .save_credentials(&json!({ "accessToken": "tok" }))
        .unwrap();
}

#[test]
fn test_version_flag() {
    let home = tempdir().unwrap();
    sonic(home.path())
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bare_invocation_shows_banner_and_help() {
    let home = tempdir().unwrap();
    sonic(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Get started"))
        .stdout(predicate::str::contains("connect"));
}

#[test]
fn test_disconnected_session_gets_connect_guidance() {
    let home = tempdir().unwrap();
    sonic(home.path())
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You need to connect to a Sonic CDN before you can start!",
        ))
        .stdout(predicate::str::contains("sonic connect"));
}

#[test]
fn test_connected_but_not_logged_in_gets_login_guidance() {
    let home = tempdir().unwrap();
    connect(home.path(), "http://cdn.example.com");

    sonic(home.path())
        .arg("buckets")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You need to log into an account before you can do that!",
        ))
        .stdout(predicate::str::contains("sonic login"));
}

#[test]
fn test_login_blocked_while_disconnected() {
    let home = tempdir().unwrap();
    sonic(home.path())
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You need to connect to a Sonic CDN before you can start!",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_users_renders_pretty_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "u1", "username": "alice" }
        ]))))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    log_in(home.path(), &server.uri());

    sonic(home.path())
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains("Response"))
        .stdout(predicate::str::contains("username: alice"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_users_json_is_raw_and_bannerless() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "u1", "username": "alice" }
        ]))))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    log_in(home.path(), &server.uri());

    sonic(home.path())
        .args(["users", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""username":"alice""#))
        .stdout(predicate::str::contains("Get started").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_buckets_delete_on_empty_list_exits_with_guidance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/buckets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    log_in(home.path(), &server.uri());

    // stdin is not a terminal; the command must finish without prompting
    sonic(home.path())
        .arg("buckets:delete")
        .assert()
        .success()
        .stdout(predicate::str::contains("You don't have buckets."))
        .stdout(predicate::str::contains("sonic buckets:create"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_assets_upload_on_empty_bucket_list_exits_with_guidance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/buckets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    log_in(home.path(), &server.uri());

    sonic(home.path())
        .args(["assets:upload", "app.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You don't have buckets."));
}
