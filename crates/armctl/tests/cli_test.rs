//! Integration tests for the `armctl` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without any endpoint; the remaining tests point the binary at a local
//! mock management API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUB: &str = "00000000-0000-0000-0000-0000000000cc";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `armctl` binary with env isolation.
///
/// Clears every `ARMCTL_*` variable and points config directories at
/// `home` so tests never touch the user's real configuration.
fn armctl_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("armctl");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("ARMCTL_PROFILE")
        .env_remove("ARMCTL_ENDPOINT")
        .env_remove("ARMCTL_SUBSCRIPTION")
        .env_remove("ARMCTL_TOKEN")
        .env_remove("ARMCTL_API_PROFILE")
        .env_remove("ARMCTL_OUTPUT")
        .env_remove("ARMCTL_INSECURE")
        .env_remove("ARMCTL_TIMEOUT");
    cmd
}

fn armctl_cmd() -> assert_cmd::Command {
    armctl_cmd_in(Path::new("/tmp/armctl-cli-test-nonexistent"))
}

/// Flags that make a command runnable without a config file.
fn endpoint_args(endpoint: &str) -> Vec<String> {
    vec![
        "--endpoint".into(),
        endpoint.into(),
        "--subscription".into(),
        SUB.into(),
        "--token".into(),
        "cli-token".into(),
    ]
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = armctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    armctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("vnet")
            .and(predicate::str::contains("public-ip"))
            .and(predicate::str::contains("group"))
            .and(predicate::str::contains("provider")),
    );
}

#[test]
fn test_version_flag() {
    armctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("armctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    armctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    armctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = armctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    armctl_cmd()
        .args(["--output", "invalid", "group", "get", "rg1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}

#[test]
fn test_unknown_allocation_rejected() {
    armctl_cmd()
        .args([
            "public-ip", "create", "pip1", "-g", "rg1", "-l", "local", "--allocation", "Sometimes",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Sometimes"));
}

#[test]
fn test_vnet_create_requires_address_prefix() {
    armctl_cmd()
        .args(["vnet", "create", "vnet1", "-g", "rg1", "-l", "local"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--address-prefix"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_group_get_without_config() {
    armctl_cmd()
        .args(["group", "get", "rg1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No endpoint configured"));
}

#[test]
fn test_unknown_profile() {
    armctl_cmd()
        .args(["--profile", "ghost", "group", "get", "rg1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_endpoint_without_token() {
    armctl_cmd()
        .args([
            "--endpoint",
            "https://management.azure.com",
            "--subscription",
            SUB,
            "group",
            "get",
            "rg1",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

#[test]
fn test_config_show_no_config() {
    armctl_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_profiles_from_file() {
    let home = tempfile::tempdir().unwrap();

    let output = armctl_cmd_in(home.path())
        .args(["config", "path"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let config_path = String::from_utf8(output.stdout).unwrap();
    let config_path = Path::new(config_path.trim());
    assert!(config_path.ends_with("config.toml"));

    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(
        config_path,
        r#"
default_profile = "hub"

[profiles.hub]
endpoint = "https://management.local.azurestack.external"
subscription_id = "sub-hub"
token = "do-not-print"

[profiles.public]
endpoint = "https://management.azure.com"
subscription_id = "sub-public"
auth_mode = "service-principal"
"#,
    )
    .unwrap();

    armctl_cmd_in(home.path())
        .args(["config", "profiles", "--output", "plain"])
        .assert()
        .success()
        .stdout("hub\npublic\n");

    armctl_cmd_in(home.path())
        .args(["config", "show", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("do-not-print").not());
}

#[test]
fn test_group_delete_requires_confirmation() {
    // stdin is not a terminal here, so only --yes could approve it.
    armctl_cmd()
        .args(endpoint_args("https://management.azure.com"))
        .args(["group", "delete", "rg1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

// ── Against a mock management API ───────────────────────────────────

async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || armctl_cmd().args(args).output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_group_exists_plain_output() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path(format!("/subscriptions/{SUB}/resourcegroups/rg1")))
        .and(query_param("api-version", "2018-02-01"))
        .and(header("authorization", "Bearer cli-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut args = endpoint_args(&server.uri());
    args.extend(["--output", "plain", "group", "exists", "rg1"].map(String::from));
    let output = run(args).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "true");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_public_ip_create_prints_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "/subscriptions/{SUB}/resourceGroups/rg1/providers/Microsoft.Network/publicIPAddresses/pip1"
        )))
        .and(query_param("api-version", "2017-10-01"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-ms-request-id", "req-42")
                .set_body_json(serde_json::json!({
                    "id": "/subscriptions/x/resourceGroups/rg1/providers/Microsoft.Network/publicIPAddresses/pip1",
                    "name": "pip1",
                    "location": "local",
                    "properties": {
                        "publicIPAllocationMethod": "Static",
                        "ipAddress": "192.0.2.10",
                        "provisioningState": "Updating"
                    }
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut args = endpoint_args(&server.uri());
    args.extend(
        [
            "--output",
            "json-compact",
            "public-ip",
            "create",
            "pip1",
            "-g",
            "rg1",
            "-l",
            "local",
            "--allocation",
            "static",
            "--ip-address",
            "192.0.2.10",
        ]
        .map(String::from),
    );
    let output = run(args).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], 201);
    assert_eq!(value["request_id"], "req-42");
    assert_eq!(value["body"]["properties"]["ipAddress"], "192.0.2.10");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_vnet_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": "ResourceNotFound",
                "message": "The Resource 'Microsoft.Network/virtualNetworks/vnet1' was not found."
            }
        })))
        .mount(&server)
        .await;

    let mut args = endpoint_args(&server.uri());
    args.extend(["vnet", "get", "vnet1", "-g", "rg1"].map(String::from));
    let output = run(args).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("was not found"));
}
