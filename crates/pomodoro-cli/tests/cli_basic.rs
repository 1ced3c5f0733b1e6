//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use pomodoro_core::storage::CONFIG_KEY;
use pomodoro_core::{Database, KeyValueStore};
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomodoro"))
        .args(args)
        .env("POMODORO_DATA_DIR", data_dir)
        .env_remove("POMODORO_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args, "");
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(dir.path(), &["config", "show"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "work": 25, "short": 5, "long": 15, "cycles": 4,
            "autoStart": true, "sound": true
        })
    );
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(dir.path(), &["config", "set", "work", "50"]);
    assert_eq!(stdout.trim(), "work = 50");
    assert_eq!(run_ok(dir.path(), &["config", "get", "work"]).trim(), "50");
}

#[test]
fn test_config_set_clamps_garbage() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["config", "set", "work", ""]);
    run_ok(dir.path(), &["config", "set", "cycles", "abc"]);
    run_ok(dir.path(), &["config", "set", "long", "500"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "work"]).trim(), "1");
    assert_eq!(run_ok(dir.path(), &["config", "get", "cycles"]).trim(), "1");
    assert_eq!(run_ok(dir.path(), &["config", "get", "long"]).trim(), "90");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "theme", "dark"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key: theme"), "stderr: {stderr}");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "theme"], "");
    assert_eq!(code, 1);
}

#[test]
fn test_config_reset() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["config", "set", "sound", "false"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "sound"]).trim(), "false");
    run_ok(dir.path(), &["config", "reset"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "sound"]).trim(), "true");
}

#[test]
fn test_malformed_record_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    {
        let db = Database::open_at(&dir.path().join("pomodoro.db")).unwrap();
        db.set(CONFIG_KEY, "{bad").unwrap();
    }
    let stdout = run_ok(dir.path(), &["config", "show"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["work"], 25);
}

#[test]
fn test_run_skip_enters_short_break() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["run", "--no-sound"], "n\nq\n");
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("Work         25:00  cycles 0  <Start>"), "stdout: {stdout}");
    assert!(stdout.contains("Short Break  05:00  cycles 0"), "stdout: {stdout}");
}

#[test]
fn test_run_overrides_are_session_only() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["run", "--work", "40", "--no-sound"],
        "apply short=9\n2\nq\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Work         40:00"), "stdout: {stdout}");
    assert!(stdout.contains("Short Break  09:00"), "stdout: {stdout}");
    assert_eq!(run_ok(dir.path(), &["config", "get", "work"]).trim(), "25");
    assert_eq!(run_ok(dir.path(), &["config", "get", "short"]).trim(), "5");
}

#[test]
fn test_run_save_persists() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["run", "--no-sound"], "save work=45 autoStart=off\nq\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Saved"), "stdout: {stdout}");
    assert!(stdout.contains("Work         45:00"), "stdout: {stdout}");
    assert_eq!(run_ok(dir.path(), &["config", "get", "work"]).trim(), "45");
    assert_eq!(run_ok(dir.path(), &["config", "get", "autoStart"]).trim(), "false");
}

#[test]
fn test_run_status_prints_snapshot() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["run", "--no-sound"], "status\n");
    assert_eq!(code, 0);
    let snapshot = stdout
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("no snapshot line");
    let json: serde_json::Value = serde_json::from_str(snapshot).unwrap();
    assert_eq!(json["type"], "state_snapshot");
    assert_eq!(json["phase"], "work");
    assert_eq!(json["remaining_ms"], 25 * 60_000);
    assert_eq!(json["running"], false);
}

#[test]
fn test_run_reports_unknown_input_and_continues() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["run", "--no-sound"], "lunch\nlong\nq\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("unknown command 'lunch'"), "stdout: {stdout}");
    assert!(stdout.contains("Long Break   15:00"), "stdout: {stdout}");
}
