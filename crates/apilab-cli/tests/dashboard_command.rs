use assert_cmd::Command;
use predicates::prelude::*;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

#[allow(deprecated)]
fn get_apilab_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("apilab")
}

fn apilab(data_dir: &Path) -> Command {
    let mut cmd = Command::new(get_apilab_bin());
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Workspace with one button that has been run twice
fn workspace_with_failed_calls() -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = apilab(temp_dir.path())
        .args(["--format", "table", "button", "add", "-n", "Offline", "-u", &closed_url()])
        .output()
        .unwrap();
    let id = String::from_utf8(output.stdout).unwrap().trim().to_string();

    apilab(temp_dir.path())
        .args(["--format", "json", "run", &id, &id])
        .assert()
        .success();
    temp_dir
}

#[test]
fn test_empty_dashboard() {
    let temp_dir = tempfile::tempdir().unwrap();

    apilab(temp_dir.path())
        .args(["dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last 24 hours"))
        .stdout(predicate::str::contains("No calls in this window"));
}

#[test]
fn test_empty_dashboard_json_has_zero_rate() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = apilab(temp_dir.path())
        .args(["--format", "json", "dashboard", "--window", "1h"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let metrics: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(metrics["total"], 0);
    assert_eq!(metrics["success_rate"], 0.0);
    assert_eq!(metrics["durations"]["median"], 0);
}

#[test]
fn test_dashboard_counts_failed_calls_as_errors() {
    let temp_dir = workspace_with_failed_calls();

    let output = apilab(temp_dir.path())
        .args(["--format", "json", "dashboard"])
        .output()
        .unwrap();
    let metrics: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(metrics["total"], 2);
    assert_eq!(metrics["error_count"], 2);
    assert_eq!(metrics["status"]["server_error"], 2);
    assert_eq!(metrics["health"], "needs_attention");
    assert_eq!(metrics["methods"][0]["method"], "GET");
    assert_eq!(metrics["methods"][0]["count"], 2);
}

#[test]
fn test_dashboard_table() {
    let temp_dir = workspace_with_failed_calls();

    apilab(temp_dir.path())
        .args(["--format", "table", "dashboard", "--window", "7d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric,Value"))
        .stdout(predicate::str::contains("Window,7d"))
        .stdout(predicate::str::contains("Total Calls,2"));
}

#[test]
fn test_invalid_window() {
    let temp_dir = tempfile::tempdir().unwrap();

    apilab(temp_dir.path())
        .args(["dashboard", "--window", "2h"])
        .assert()
        .failure();
}

#[test]
fn test_watch_rejects_zero_interval() {
    let temp_dir = tempfile::tempdir().unwrap();

    apilab(temp_dir.path())
        .args(["dashboard", "--watch", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1 second"));
}

#[test]
fn test_export_writes_window_file() {
    let temp_dir = workspace_with_failed_calls();
    let out_dir = tempfile::tempdir().unwrap();

    apilab(temp_dir.path())
        .args(["export", "--window", "1h", "--output-dir"])
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 call(s)"));

    let exported: Vec<_> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(exported.len(), 1);
    assert!(exported[0].starts_with("api-calls-1h-"));
    assert!(exported[0].ends_with(".json"));

    let text = std::fs::read_to_string(out_dir.path().join(&exported[0])).unwrap();
    let calls: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(calls.len(), 2);
}

#[test]
fn test_export_to_missing_dir_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    apilab(temp_dir.path())
        .args(["export", "--output-dir"])
        .arg(temp_dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}
