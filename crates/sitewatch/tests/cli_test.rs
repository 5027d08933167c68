//! Integration tests for the `sitewatch` CLI binary.
//!
//! Argument parsing, help, completions, and error paths run without any
//! server. The `sites` round-trips run against a wiremock API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `sitewatch` with env isolation: no `SITEWATCH_*` vars and config
/// directories pointed at a nonexistent path.
fn sitewatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sitewatch");
    cmd.env("HOME", "/tmp/sitewatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sitewatch-cli-test-nonexistent")
        .env_remove("SITEWATCH_PROFILE")
        .env_remove("SITEWATCH_API_URL")
        .env_remove("SITEWATCH_API_KEY")
        .env_remove("SITEWATCH_OUTPUT")
        .env_remove("SITEWATCH_INSECURE")
        .env_remove("SITEWATCH_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn api_with_sites() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Paris Centre", "address": "Rue A", "status": "online" },
            { "id": 2, "name": "Lyon Sud", "address": "Rue B", "status": "pending" },
        ])))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sitewatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sitewatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("sites")
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    sitewatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitewatch"));
}

#[test]
fn test_sites_help_lists_actions() {
    sitewatch_cmd().args(["sites", "--help"]).assert().success().stdout(
        predicate::str::contains("watch")
            .and(predicate::str::contains("associate"))
            .and(predicate::str::contains("delete")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sitewatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sitewatch_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sitewatch_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_sites_list_without_config() {
    sitewatch_cmd()
        .args(["sites", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_unknown_profile_is_reported() {
    sitewatch_cmd()
        .args(["--profile", "nope", "sites", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_invalid_status_filter() {
    let output = sitewatch_cmd()
        .args(["sites", "list", "--status", "sideways"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("sideways"));
}

#[test]
fn test_create_requires_name_and_address() {
    sitewatch_cmd()
        .args(["sites", "create", "--name", "Lille"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--address"));
}

#[test]
fn test_config_path_prints_location() {
    sitewatch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_profiles_when_empty() {
    sitewatch_cmd()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("config init"));
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_applies_search() {
    let server = api_with_sites().await;

    let output = sitewatch_cmd()
        .args(["sites", "list", "-o", "json", "--search", "LYON"])
        .args(["--api-url", &server.uri()])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Lyon Sud");
    assert_eq!(rows[0]["can_associate"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_plain_keeps_server_order() {
    let server = api_with_sites().await;

    sitewatch_cmd()
        .args(["sites", "list", "-o", "plain", "--api-url", &server.uri()])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_server_error_exits_with_connection_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let output = sitewatch_cmd()
        .args(["sites", "list", "--api-url", &server.uri()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Unable to load sites"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused_off_tty() {
    let server = api_with_sites().await;

    let output = sitewatch_cmd()
        .args(["sites", "delete", "1", "--api-url", &server.uri()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes_notifies() {
    let server = api_with_sites().await;
    Mock::given(method("DELETE"))
        .and(path("/sites/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    sitewatch_cmd()
        .args(["sites", "delete", "1", "--yes", "--api-url", &server.uri()])
        .assert()
        .success()
        .stderr(predicate::str::contains("The site was deleted."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_associate_online_site_is_skipped() {
    let server = api_with_sites().await;

    sitewatch_cmd()
        .args(["sites", "associate", "1", "--api-url", &server.uri()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Nothing to do"));
}
