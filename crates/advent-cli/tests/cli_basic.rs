//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary home directory and
//! pins the clock with `--now`.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_advent-cli"))
        .env("HOME", home)
        .env_remove("ADVENT_ENV")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed {:?}: {}", args, stderr);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_topic_list() {
    let home = tempfile::tempdir().unwrap();
    let topics = run_json(home.path(), &["topic", "list"]);
    assert_eq!(topics.as_array().unwrap().len(), 5);
    assert_eq!(topics[0]["title"], "New Year");
}

#[test]
fn test_unknown_topic_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["topic", "choose", "autumn"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown topic"));
}

#[test]
fn test_door_needs_topic() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["door", "open", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("choose a topic"));
}

#[test]
fn test_calendar_flow() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    let start = "2026-12-01T09:00:00+01:00";
    let day_three = "2026-12-03T10:00:00+01:00";
    let evening = "2026-12-03T21:15:00+01:00";

    let cycle = run_json(home, &["--now", start, "topic", "choose", "winter"]);
    assert_eq!(cycle["topic"], "winter");

    let shown = run_json(home, &["--now", day_three, "topic", "show"]);
    assert_eq!(shown["current_day"], 3);

    let done = run_json(home, &["--now", day_three, "door", "complete", "1"]);
    assert_eq!(done["stats"]["completed"], 1);
    assert!(done["survey"].is_null());
    assert_eq!(shown["days_remaining"], 27);
    let door = run_json(home, &["--now", day_three, "door", "open", "1"]);
    assert_eq!(door["outcome"], "open");
    assert_eq!(door["day"], 2);

    let locked = run_json(home, &["--now", day_three, "door", "open", "4"]);
    assert_eq!(locked["outcome"], "locked");

    let check = run_json(home, &["--now", day_three, "survey", "check"]);
    assert!(check["due"].is_null());
    let check = run_json(home, &["--now", evening, "survey", "check"]);
    assert_eq!(check["due"]["day"], 3);

    let late = run_json(home, &["--now", evening, "door", "complete", "2"]);
    assert_eq!(late["survey"]["day"], 2);
    assert_eq!(late["stats"]["completed"], 2);

    let stats = run_json(
        home,
        &["--now", evening, "survey", "send", "3", "--liked", "true", "--did-everything", "false"],
    );
    assert_eq!(stats["likes"], 1);
    assert_eq!(stats["completed"], 2);
    assert_eq!(stats["result_percent"], 7);

    let archive = run_json(home, &["--now", evening, "archive"]);
    assert!(archive.as_array().unwrap().is_empty());

    let (_, _, code) = run_cli(home, &["--now", evening, "new-cycle"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "survey.trigger_hour"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "21");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "survey.trigger_hour", "20"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "survey.trigger_hour"]);
    assert_eq!(stdout.trim(), "20");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "survey.trigger_hour", "25"]);
    assert_ne!(code, 0);
}
