//! Smoke tests for the emergent-e2e binary
//!
//! Runs go against the simulator so no browser is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the emergent-e2e binary
fn emergent_e2e() -> Command {
    let mut cmd = Command::cargo_bin("emergent-e2e").expect("emergent-e2e binary should exist");
    cmd.env_remove("RUST_LOG").env_remove("EMERGENT_E2E_CONFIG");
    cmd
}

/// Simulated run writing its artifacts under `dir`
fn simulated(dir: &Path) -> Command {
    let mut cmd = emergent_e2e();
    cmd.arg("--simulate")
        .arg("--color=never")
        .arg("--set")
        .arg(format!("report.path={}", dir.join("reports").display()))
        .arg("--set")
        .arg(format!("screenshot.path={}", dir.join("shots").display()));
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    emergent_e2e()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    emergent_e2e()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--simulate"))
        .stdout(predicate::str::contains("--feature"))
        .stdout(predicate::str::contains("--set"));
}

#[test]
fn test_unknown_flag_fails() {
    emergent_e2e().arg("--turbo").assert().failure();
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_list_shows_catalogue() {
    emergent_e2e()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("authentication ("))
        .stdout(predicate::str::contains("project_settings ("))
        .stdout(predicate::str::contains("successful_login"));
}

#[test]
fn test_list_respects_feature_and_filter() {
    emergent_e2e()
        .args(["--list", "--feature", "authentication", "--filter", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("authentication (1)"))
        .stdout(predicate::str::contains("deployment").not());
}

// ============================================================================
// Argument and configuration errors
// ============================================================================

#[test]
fn test_unknown_feature_fails() {
    emergent_e2e()
        .args(["--list", "--feature", "billing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("billing"));
}

#[test]
fn test_malformed_set_fails() {
    emergent_e2e()
        .args(["--list", "--set", "headless"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn test_unknown_config_key_fails() {
    emergent_e2e()
        .args(["--list", "--set", "colour=blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_missing_config_file_fails() {
    emergent_e2e()
        .args(["--list", "--config", "/nonexistent/suite.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_zero_parallel_fails() {
    emergent_e2e()
        .args(["--list", "--parallel", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parallel"));
}

#[test]
fn test_config_file_is_loaded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("suite.yaml");
    fs::write(&path, "base.url: \"ftp://example.com\"\n").unwrap();

    emergent_e2e()
        .args(["--list", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("base.url"));
}

// ============================================================================
// Simulated runs
// ============================================================================

#[test]
fn test_simulated_run_succeeds() {
    let temp = TempDir::new().unwrap();
    simulated(temp.path())
        .args(["--filter", "logout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED 1 scenarios"));

    let reports = fs::read_dir(temp.path().join("reports")).unwrap().count();
    assert_eq!(reports, 1);
}

#[test]
fn test_quiet_run_prints_nothing_on_success() {
    let temp = TempDir::new().unwrap();
    simulated(temp.path())
        .args(["-q", "--feature", "authentication", "--filter", "logout"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_run_lists_each_scenario() {
    let temp = TempDir::new().unwrap();
    simulated(temp.path())
        .args(["-v", "--filter", "successful_login"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASS authentication::successful_login"));
}

#[test]
fn test_empty_selection_succeeds() {
    let temp = TempDir::new().unwrap();
    simulated(temp.path())
        .args(["--filter", "no_such_scenario"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No scenarios match"));
}

#[test]
fn test_browser_run_without_cdp_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let mut cmd = emergent_e2e();
    cmd.args(["--color=never", "--filter", "logout"])
        .args(["--set", "browser=firefox"])
        .arg("--set")
        .arg(format!("report.path={}", dir.join("reports").display()))
        .arg("--set")
        .arg(format!("screenshot.path={}", dir.join("shots").display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 scenarios failed"));
}

#[test]
fn test_sample_config_is_valid() {
    let sample = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/suite.yaml");
    emergent_e2e()
        .args(["--list", "--config", sample, "--feature", "testing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("testing ("));
}
