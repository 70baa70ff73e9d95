//! Integration tests for the `aci` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and
//! validation errors, all without a live controller.
#![allow(clippy::unwrap_used)]

use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// `aci` with `ACI_*` cleared and config pointed at `home`.
fn aci_cmd_in(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("aci");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("ACI_PROFILE")
        .env_remove("ACI_CONTROLLER")
        .env_remove("ACI_USERNAME")
        .env_remove("ACI_PASSWORD")
        .env_remove("ACI_OUTPUT")
        .env_remove("ACI_INSECURE")
        .env_remove("ACI_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn aci_cmd() -> assert_cmd::Command {
    aci_cmd_in(std::path::Path::new("/tmp/aci-cli-test-nonexistent"))
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = aci_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    aci_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("APIC")
            .and(predicate::str::contains("nodes"))
            .and(predicate::str::contains("geo"))
            .and(predicate::str::contains("tenants"))
            .and(predicate::str::contains("vrfs")),
    );
}

#[test]
fn test_version_flag() {
    aci_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aci"));
}

#[test]
fn test_completions_zsh() {
    aci_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_node_id_out_of_range_is_rejected_by_parser() {
    let output = aci_cmd()
        .args(["nodes", "add", "FOC0849N1BD", "--id", "42"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("101"));
}

#[test]
fn test_unknown_role_is_rejected_by_parser() {
    aci_cmd()
        .args(["nodes", "add", "FOC0849N1BD", "--id", "101", "--role", "border"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_node_name_fails_before_connecting() {
    // Port 9 (discard) is never contacted: validation fails first.
    aci_cmd()
        .args([
            "--controller",
            "https://127.0.0.1:9",
            "--username",
            "admin",
            "--password",
            "pw",
            "nodes",
            "add",
            "FOC0849N1BD",
            "--id",
            "101",
            "--name",
            "leaf-",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("name"));
}

#[test]
fn test_floor_requires_building() {
    aci_cmd()
        .args(["geo", "add", "--site", "hq", "--floor", "f1"])
        .assert()
        .code(2);
}

#[test]
fn test_vrfs_need_tenant() {
    aci_cmd()
        .args([
            "--controller",
            "apic1.example.com",
            "-u",
            "admin",
            "--password",
            "pw",
            "vrfs",
            "list",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("tenant"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_controller_is_a_config_error() {
    aci_cmd()
        .args(["nodes", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("controller"));
}

#[test]
fn test_missing_credentials() {
    aci_cmd()
        .args(["--controller", "apic1.example.com", "tenants", "list"])
        .assert()
        .code(3);
}

#[test]
fn test_unknown_profile() {
    aci_cmd()
        .args(["--profile", "nope", "tenants", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_config_show_without_file() {
    aci_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_set_then_show_masks_password() {
    let home = tempfile::tempdir().unwrap();

    aci_cmd_in(home.path())
        .args(["config", "set", "controller", "apic1.lab.example.com"])
        .assert()
        .success();
    aci_cmd_in(home.path())
        .args(["config", "set", "password", "hunter2"])
        .assert()
        .success();

    aci_cmd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("apic1.lab.example.com")
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    aci_cmd_in(home.path())
        .args(["config", "use", "ghost"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ghost"));
}
