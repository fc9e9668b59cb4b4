//! Integration tests for the `tapfleet` CLI binary.
//!
//! Every test runs against its own temporary store directory and config
//! path, so nothing touches the user's real data.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// A `tapfleet` command isolated from the environment, with `--store`
/// and `--config` pointing into `dir`.
fn tapfleet(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tapfleet");
    cmd.env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg-config"))
        .env("XDG_DATA_HOME", dir.join("xdg-data"))
        .env("NO_COLOR", "1")
        .env_remove("TAPFLEET_CONFIG")
        .env_remove("TAPFLEET_STORE_PATH")
        .env_remove("TAPFLEET_STORE_KEY")
        .env_remove("TAPFLEET_DEFAULTS_OUTPUT")
        .env_remove("TAPFLEET_DEFAULTS_COLOR")
        .env_remove("RUST_LOG")
        .arg("--store")
        .arg(dir.join("store"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = tapfleet(dir).args(args).args(["-o", "json"]).output().unwrap();
    assert!(
        output.status.success(),
        "{args:?} failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn port(dir: &Path, device: &str, port: &str) -> Value {
    json(dir, &["ports", "get", device, port])
}

fn export(dir: &Path) -> String {
    let output = tapfleet(dir).args(["store", "export"]).output().unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = cargo_bin_cmd!("tapfleet").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("tapfleet").arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("ports"))
            .and(predicate::str::contains("batch"))
            .and(predicate::str::contains("store")),
    );
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("tapfleet")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tapfleet"));
}

#[test]
fn completions_zsh() {
    cargo_bin_cmd!("tapfleet")
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Reads ───────────────────────────────────────────────────────────

#[test]
fn first_run_seeds_the_store() {
    let dir = TempDir::new().unwrap();
    let devices = json(dir.path(), &["devices", "list"]);
    let ids: Vec<&str> = devices
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["switch-001", "switch-002", "switch-003", "switch-004"]);
    assert!(dir.path().join("store").join("switchData.json").exists());

    tapfleet(dir.path())
        .args(["store", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("switchData.json"));
}

#[test]
fn plain_port_list_filters_connected() {
    let dir = TempDir::new().unwrap();
    tapfleet(dir.path())
        .args(["ports", "list", "switch-004", "--connected", "-o", "plain"])
        .assert()
        .success()
        .stdout("1\n2\n3\n4\n5\n6\n");

    let ports = json(dir.path(), &["ports", "list", "Edge TAP-4", "--poe"]);
    assert!(
        ports
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["poeEnabled"] == Value::Bool(true))
    );
}

#[test]
fn unknown_port_exits_not_found() {
    let dir = TempDir::new().unwrap();
    tapfleet(dir.path())
        .args(["ports", "get", "switch-004", "17"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));

    tapfleet(dir.path())
        .args(["devices", "get", "switch-999"])
        .assert()
        .code(4);
}

// ── Writes ──────────────────────────────────────────────────────────

#[test]
fn batch_apply_patches_only_selected_ports() {
    let dir = TempDir::new().unwrap();
    let untouched = port(dir.path(), "switch-002", "2");

    let outcome = json(
        dir.path(),
        &[
            "batch",
            "apply",
            "--select",
            "switch-002:1,3,5",
            "--poe-enabled",
            "true",
            "--poe-priority",
            "high",
        ],
    );
    assert_eq!(outcome["devicesUpdated"], 1);
    assert_eq!(outcome["portsUpdated"], 3);

    for id in ["1", "3", "5"] {
        let p = port(dir.path(), "switch-002", id);
        assert_eq!(p["poeEnabled"], true);
        assert_eq!(p["poePriority"], "high");
    }
    assert_eq!(port(dir.path(), "switch-002", "2"), untouched);
}

#[test]
fn batch_across_devices_reports_skipped_ports() {
    let dir = TempDir::new().unwrap();
    let outcome = json(
        dir.path(),
        &[
            "batch", "apply", "-s", "switch-001:10", "-s", "switch-004:16-17", "--mtu", "9000",
        ],
    );
    assert_eq!(outcome["devicesUpdated"], 2);
    assert_eq!(outcome["portsUpdated"], 2);
    assert_eq!(outcome["skipped"][0]["deviceId"], "switch-004");
    assert_eq!(outcome["skipped"][0]["portId"], 17);

    assert_eq!(port(dir.path(), "switch-001", "10")["mtu"], 9000);
    assert_eq!(port(dir.path(), "switch-004", "16")["mtu"], 9000);
}

#[test]
fn out_of_range_value_is_rejected_without_writing() {
    let dir = TempDir::new().unwrap();
    let before = export(dir.path());

    tapfleet(dir.path())
        .args(["batch", "apply", "-s", "switch-002:1", "--vlan-id", "5000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("vlanId"));

    assert_eq!(export(dir.path()), before);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let before = export(dir.path());

    let plan = json(
        dir.path(),
        &["batch", "apply", "-s", "switch-002:1-4", "--storm-control", "true", "--dry-run"],
    );
    assert_eq!(plan[0]["device"], "switch-002");
    assert_eq!(plan[0]["targeted"], 4);

    assert_eq!(export(dir.path()), before);
}

#[test]
fn empty_patch_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    tapfleet(dir.path())
        .args(["batch", "apply", "-s", "switch-002:1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn ports_set_edits_and_clears_fields() {
    let dir = TempDir::new().unwrap();
    let edited = json(
        dir.path(),
        &[
            "ports", "set", "switch-004", "3", "--name", "mirror", "--clear", "description",
        ],
    );
    assert_eq!(edited["name"], "mirror");
    assert!(edited.get("description").is_none());

    let stored = port(dir.path(), "switch-004", "3");
    assert_eq!(stored, edited);
    assert_ne!(port(dir.path(), "switch-001", "3")["name"], "mirror");

    tapfleet(dir.path())
        .args(["ports", "set", "switch-004", "3", "--clear", "name"])
        .assert()
        .code(2);
}

#[test]
fn ports_set_from_file() {
    let dir = TempDir::new().unwrap();
    let patch = dir.path().join("patch.json");
    std::fs::write(&patch, r#"{"vlanMode":"trunk","allowedVlans":"10-20","nativeVlan":10}"#).unwrap();

    let edited = json(
        dir.path(),
        &["ports", "set", "switch-003", "2", "-F", patch.to_str().unwrap()],
    );
    assert_eq!(edited["vlanMode"], "trunk");
    assert_eq!(edited["allowedVlans"], "10-20");
    assert_eq!(edited["nativeVlan"], 10);
}

#[test]
fn store_reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    let seed = export(dir.path());
    json(dir.path(), &["batch", "apply", "-s", "switch-001:1", "--mtu", "9000"]);
    assert_ne!(export(dir.path()), seed);

    // No terminal to prompt on.
    tapfleet(dir.path())
        .args(["store", "reset"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    tapfleet(dir.path())
        .args(["store", "reset", "-y"])
        .assert()
        .success()
        .stderr(predicate::str::contains("4 seed device(s)"));
    assert_eq!(export(dir.path()), seed);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();
    tapfleet(dir.path())
        .args(["config", "init", "-y", "--key", "lab"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    let cfg = json(dir.path(), &["config", "show"]);
    assert_eq!(cfg["store"]["key"], "lab");

    tapfleet(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn invalid_output_format() {
    let dir = TempDir::new().unwrap();
    tapfleet(dir.path())
        .args(["--output", "xml", "devices", "list"])
        .assert()
        .code(2);
}
