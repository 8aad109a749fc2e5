//! Integration tests for the `lldpdesc` CLI binary.
//!
//! Argument parsing, offline commands, config handling, and a full sync
//! round against a mocked Junos REST API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `lldpdesc` binary with env isolation.
///
/// Clears all `LLDPDESC_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn lldpdesc_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lldpdesc");
    cmd.env("LLDPDESC_CONFIG", config)
        .env("HOME", "/tmp/lldpdesc-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lldpdesc-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LLDPDESC_PROFILE")
        .env_remove("LLDPDESC_TRANSPORT")
        .env_remove("LLDPDESC_USERNAME")
        .env_remove("LLDPDESC_PASSWORD")
        .env_remove("LLDPDESC_OUTPUT")
        .env_remove("LLDPDESC_INSECURE")
        .env_remove("LLDPDESC_TIMEOUT");
    cmd
}

fn scratch() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    (dir, config)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn leaf(value: &str) -> serde_json::Value {
    json!([{ "data": value }])
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, config) = scratch();
    let output = lldpdesc_cmd(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config).arg("--help").assert().success().stdout(
        predicate::str::contains("LLDP")
            .and(predicate::str::contains("sync"))
            .and(predicate::str::contains("decode"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lldpdesc"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Decode ──────────────────────────────────────────────────────────

#[test]
fn test_decode_plain() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["-o", "plain", "decode", "uplink LLDP: core1 xe-0/0/1(DOWN)"])
        .assert()
        .success()
        .stdout("core1 xe-0/0/1 down\n");
}

#[test]
fn test_decode_json() {
    let (_dir, config) = scratch();
    let output = lldpdesc_cmd(&config)
        .args(["-o", "json", "decode", "LLDP: r1 ge-0/0/10"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["system"], "r1");
    assert_eq!(value["port"], "ge-0/0/10");
    assert_eq!(value["down"], false);
    assert_eq!(value["tracked"], true);
}

#[test]
fn test_decode_untracked() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["-o", "plain", "decode", "to printer"])
        .assert()
        .success()
        .stdout("untracked\n");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_override() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_then_show() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["config", "set", "port", "3443"])
        .assert()
        .success();
    assert!(config.exists());

    lldpdesc_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 3443"));
}

#[test]
fn test_config_use_unknown_profile() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["config", "use", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prod"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_dir, config) = scratch();
    let output = lldpdesc_cmd(&config).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let (_dir, config) = scratch();
    let output = lldpdesc_cmd(&config)
        .args(["--output", "invalid", "decode", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about invalid output format:\n{text}"
    );
}

#[test]
fn test_sync_requires_devices() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .arg("sync")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<DEVICES>"));
}

#[test]
fn test_sync_without_credentials() {
    let (_dir, config) = scratch();
    // stdin is not a terminal here, so nothing is prompted for
    lldpdesc_cmd(&config)
        .args(["sync", "sw1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_sync_unknown_profile() {
    let (_dir, config) = scratch();
    lldpdesc_cmd(&config)
        .args(["--profile", "prod", "sync", "sw1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}

// ── Sync against a mocked device ────────────────────────────────────

async fn mock_device() -> MockServer {
    let server = MockServer::start().await;

    let neighbors = json!({
        "lldp-neighbors-information": [{
            "lldp-neighbor-information": [{
                "lldp-local-port-id": leaf("ge-0/0/1"),
                "lldp-remote-system-name": leaf("r1"),
                "lldp-remote-port-id": leaf("ge-0/0/10")
            }]
        }]
    });
    let interfaces = json!({
        "interface-information": [{
            "physical-interface": [
                { "name": leaf("ge-0/0/1") },
                { "name": leaf("ge-0/0/2"), "description": leaf("LLDP: r2 xe-0/0/0") }
            ]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/rpc/get-lldp-neighbors-information@format=json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&neighbors))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rpc/get-interface-information@format=json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&interfaces))
        .mount(&server)
        .await;
    // A dry run must never reach the configuration RPCs.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_dry_run_reports_events() {
    let server = mock_device().await;
    let port = server.address().port().to_string();
    let (_dir, config) = scratch();

    let mut cmd = lldpdesc_cmd(&config);
    cmd.env("LLDPDESC_PASSWORD", "s3cret")
        .args(["--user", "netops", "--port", &port, "-o", "plain"])
        .args(["sync", "--dry-run", "127.0.0.1"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        stdout,
        "127.0.0.1: ge-0/0/1 LLDP Up. Now: r1 ge-0/0/10\n\
         127.0.0.1: ge-0/0/2 LLDP Down. Was: r2 xe-0/0/0\n\
         127.0.0.1: dry run, not committed\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_auth_failure_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let port = server.address().port().to_string();
    let (_dir, config) = scratch();

    let mut cmd = lldpdesc_cmd(&config);
    cmd.env("LLDPDESC_PASSWORD", "wrong")
        .args(["--user", "netops", "--port", &port])
        .args(["sync", "127.0.0.1"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_failed_device_does_not_stop_the_others() {
    let server = mock_device().await;
    let port = server.address().port().to_string();
    let (_dir, config) = scratch();

    // Nothing listens on 127.0.0.2 at the mock's port.
    let mut cmd = lldpdesc_cmd(&config);
    cmd.env("LLDPDESC_PASSWORD", "s3cret")
        .args(["--user", "netops", "--port", &port, "--timeout", "5", "-o", "plain"])
        .args(["sync", "--dry-run", "127.0.0.1", "127.0.0.2"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    assert!(
        stdout.starts_with(
            "127.0.0.1: ge-0/0/1 LLDP Up. Now: r1 ge-0/0/10\n\
             127.0.0.1: ge-0/0/2 LLDP Down. Was: r2 xe-0/0/0\n\
             127.0.0.1: dry run, not committed\n"
        ),
        "{stdout}"
    );
    assert!(stdout.contains("127.0.0.2: failed:"), "{stdout}");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("1 of 2"),
        "{}",
        combined_output(&output)
    );
}
