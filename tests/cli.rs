use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary config directory
fn temp_config_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".trend-dash").join("config.json")
}

const BINARY_NAME: &str = "trend-dash";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Command-line arguments"));
}

#[test]
/// init-config should write the default dashboard under $HOME.
fn init_config_creates_config_file() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    assert!(!config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("init-config")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Config written"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("\"trending\""));
}

#[test]
/// init-config should not clobber an existing file without --force.
fn init_config_keeps_existing_file() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, r#"{"sources": []}"#).unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("init-config")
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("already exists"));

    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        r#"{"sources": []}"#
    );
}

#[test]
/// Without a config file the stock sources are listed.
fn sources_lists_default_sources() {
    let tmp = temp_config_dir();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("sources")
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("trending"))
        .stdout(contains("/api/scheduler/status"));
}

#[test]
/// A source polling faster than once a second is rejected before any fetch.
fn once_rejects_short_interval() {
    let tmp = temp_config_dir();
    let config_path = tmp.path().join("fast.json");
    fs::write(
        &config_path,
        r#"{"sources": [{"id": "status", "interval_ms": 500,
             "endpoint": {"kind": "scheduler_status"}}]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("once")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(contains("interval_ms must be at least 1000"));
}

#[test]
/// Every source failing makes `once` exit non-zero.
fn once_fails_when_api_is_unreachable() {
    let tmp = temp_config_dir();
    let config_path = tmp.path().join("one.json");
    fs::write(
        &config_path,
        r#"{"sources": [{"id": "status", "interval_ms": 30000, "timeout_ms": 2000,
             "endpoint": {"kind": "scheduler_status"}}]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("once")
        .arg("--config")
        .arg(&config_path)
        .arg("--base-url")
        .arg("http://127.0.0.1:9")
        .assert()
        .failure()
        .stdout(contains("status"));
}

#[test]
/// A missing workflow program is reported and exits non-zero.
fn launch_workflow_reports_missing_program() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("launch-workflow")
        .arg("--program")
        .arg("trend-dash-no-such-program")
        .assert()
        .failure()
        .stdout(contains("failed to start"));
}
