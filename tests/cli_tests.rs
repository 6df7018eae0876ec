//! CLI integration tests.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::TempDir;

fn depthrace(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("depthrace");
    // Keep a stray depthrace.toml in the working directory out of the tests.
    cmd.current_dir(dir);
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run depthrace");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        other => Decimal::from_str(&other.to_string()).expect("decimal number"),
    }
}

const BOOK: &str = r#"{"token_id": "yes", "asks": [[0.50, 100], [0.60, 50]]}"#;

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    depthrace(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("races"))
        .stdout(predicate::str::contains("build-races"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn test_simulate_text_output() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", BOOK);

    depthrace(dir.path())
        .args(["simulate", "--budget", "80", "--book"])
        .arg(&book)
        .assert()
        .success()
        .stdout(predicate::str::contains("Shares"))
        .stdout(predicate::str::contains("150"));
}

#[test]
fn test_simulate_json_output() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", BOOK);

    let value = json_stdout(
        depthrace(dir.path())
            .args(["simulate", "--json", "--budget", "200", "--book"])
            .arg(&book),
    );

    assert_eq!(value["command"], "simulate");
    let outcome = &value["outcome"];
    assert_eq!(decimal(&outcome["actual_spent"]), dec!(80));
    assert_eq!(decimal(&outcome["shares_acquired"]), dec!(150));
    assert_eq!(outcome["insufficient_liquidity"], true);
}

#[test]
fn test_simulate_cents_from_config() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", r#"{"asks": [[50, 100], [60, 50]]}"#);
    let config = write(&dir, "cents.toml", "[simulator]\nunit = \"cents\"\n");

    let value = json_stdout(
        depthrace(dir.path())
            .args(["simulate", "--json", "--budget", "80", "--book"])
            .arg(&book)
            .arg("--config")
            .arg(&config),
    );

    assert_eq!(value["unit"], "cents");
    assert_eq!(decimal(&value["outcome"]["shares_acquired"]), dec!(150));
}

#[test]
fn test_simulate_negative_budget_fails() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", BOOK);

    depthrace(dir.path())
        .args(["simulate", "--budget=-5", "--book"])
        .arg(&book)
        .assert()
        .failure()
        .stderr(predicate::str::contains("budget must not be negative"));
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    depthrace(dir.path())
        .args(["races", "--file", "does-not-exist.json"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", BOOK);
    let config = write(&dir, "bad.toml", "[races]\ntime_window_ms = -1\n");

    depthrace(dir.path())
        .args(["simulate", "--budget", "1", "--book"])
        .arg(&book)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("races.time_window_ms"));
}

#[test]
fn test_races_json_output() {
    let dir = TempDir::new().unwrap();
    let races = write(
        &dir,
        "races.json",
        r#"{"races": [
            {"token_id": "tok", "count": "3", "results": [
                {"container_id": "a", "timestamp": 1000, "diff_ms": 0},
                {"container_id": "b", "timestamp": 1030, "diff_ms": 30}
            ]},
            {"event_key": "tok", "occurrence": 4, "participants": [
                {"source_id": "b", "timestamp_ms": 2000, "diff_from_fastest_ms": 0},
                {"source_id": "a", "timestamp_ms": 2010, "diff_from_fastest_ms": 10}
            ]}
        ]}"#,
    );

    let value = json_stdout(
        depthrace(dir.path())
            .args(["races", "--json", "--file"])
            .arg(&races),
    );

    assert_eq!(value["races"], 2);
    let sources = value["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["source_id"], "a");
    assert_eq!(sources[0]["wins"], 1);
    assert_eq!(sources[0]["total_participations"], 2);
    assert_eq!(sources[0]["mean_positive_latency_ms"], 10.0);
}

#[test]
fn test_races_negative_diff_fails() {
    let dir = TempDir::new().unwrap();
    let races = write(
        &dir,
        "races.json",
        r#"[{"event_key": "tok", "occurrence": 1, "participants": [
            {"source_id": "a", "timestamp_ms": 1000, "diff_from_fastest_ms": -5}
        ]}]"#,
    );

    depthrace(dir.path())
        .args(["races", "--file"])
        .arg(&races)
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative diff"));
}

#[test]
fn test_build_races_and_activity() {
    let dir = TempDir::new().unwrap();
    let detections = write(
        &dir,
        "detections.json",
        r#"[
            {"source_id": "a", "event_key": "tok", "occurrence": 1, "timestamp_ms": 1000},
            {"source_id": "b", "event_key": "tok", "occurrence": 1, "timestamp_ms": 1025},
            {"source_id": "b", "event_key": "tok", "occurrence": 2, "timestamp_ms": 5000}
        ]"#,
    );

    let built = json_stdout(
        depthrace(dir.path())
            .args(["build-races", "--json", "--file"])
            .arg(&detections),
    );
    assert_eq!(built["total_races"], 1);
    assert_eq!(built["races"][0]["winner"], "a");
    assert_eq!(built["races"][0]["time_spread_ms"], 25);

    let activity = json_stdout(
        depthrace(dir.path())
            .args(["activity", "--json", "--file"])
            .arg(&detections),
    );
    assert_eq!(activity["total_entries"], 3);
    assert_eq!(activity["sources"][0]["source_id"], "b");
    assert_eq!(activity["sources"][0]["detections"], 2);
}

#[test]
fn test_build_races_negative_window_fails() {
    let dir = TempDir::new().unwrap();
    let detections = write(
        &dir,
        "detections.json",
        r#"[{"source_id": "a", "event_key": "tok", "occurrence": 1, "timestamp_ms": 1000}]"#,
    );

    depthrace(dir.path())
        .args(["build-races", "--window-ms=-5", "--file"])
        .arg(&detections)
        .assert()
        .failure()
        .stderr(predicate::str::contains("time_window_ms"));
}

#[test]
fn test_history_target() {
    let dir = TempDir::new().unwrap();
    let history = write(
        &dir,
        "history.json",
        r#"[
            {"_timestamp": 300, "asks": [[0.52, 10]]},
            {"_timestamp": 200, "asks": [[0.44, 10]]},
            {"_timestamp": 100, "asks": [[0.40, 10]]}
        ]"#,
    );

    let value = json_stdout(
        depthrace(dir.path())
            .args(["history", "--json", "--target", "0.45", "--file"])
            .arg(&history),
    );

    assert_eq!(value["target_found"], true);
    let summary = &value["history"];
    assert_eq!(decimal(&summary["current_price"]), dec!(0.52));
    assert_eq!(decimal(&summary["best_price"]), dec!(0.40));
    assert_eq!(summary["target_hit"]["timestamp_ms"], 200);
    assert_eq!(decimal(&value["difference"]), dec!(0.12));
}
