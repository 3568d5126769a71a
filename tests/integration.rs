// Integration tests for the gripper-ranker CLI surface.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes and stdout/stderr output.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to build a Command for the ranker binary, isolated from the
/// caller's home config and log filter.
fn ranker(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gripper-ranker").expect("binary should exist");
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_version_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    ranker(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gripper-ranker"));
}

#[test]
fn cli_help_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    ranker(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weighted multi-criteria ranking"));
}

#[test]
fn rank_requires_kind() {
    let home = TempDir::new().expect("temp dir should be created");
    ranker(&home)
        .arg("rank")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn rank_rejects_unknown_kind() {
    let home = TempDir::new().expect("temp dir should be created");
    ranker(&home)
        .args(["rank", "--kind", "camera"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn kinds_lists_every_kind() {
    let home = TempDir::new().expect("temp dir should be created");
    ranker(&home)
        .args(["--root"])
        .arg(home.path())
        .arg("kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gripper (gripper)"))
        .stdout(predicate::str::contains("Sensor (sensor)"))
        .stdout(predicate::str::contains("Tactile Sensor (tactile_sensor)"))
        .stdout(predicate::str::contains("Proximity Sensor (proximity_sensor)"))
        .stdout(predicate::str::contains("  Cost: direct (default 5)"));
}

#[test]
fn invalid_config_is_a_runtime_failure() {
    let home = TempDir::new().expect("temp dir should be created");
    std::fs::write(home.path().join("ranker.toml"), "[ranking.weights]\ncomfort = 1.0\n")
        .expect("config should write");
    ranker(&home)
        .arg("--root")
        .arg(home.path())
        .args(["rank", "--kind", "gripper"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown key"));
}
