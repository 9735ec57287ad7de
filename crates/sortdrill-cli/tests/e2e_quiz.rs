//! E2E tests for `sortdrill play` and `sortdrill solve`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A command isolated from the caller's config directory and overrides.
fn sortdrill_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sortdrill"));
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env("SORTDRILL_LOG", "error");
    cmd.env_remove("SORTDRILL_ALGORITHM");
    cmd.env_remove("SORTDRILL_ORDER");
    cmd.env_remove("SORTDRILL_CONVERGENCE");
    cmd.env_remove("SORTDRILL_FORMAT");
    cmd
}

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("every line is a JSON event"))
        .collect()
}

#[test]
fn bubble_walkthrough_over_stdin() {
    let home = TempDir::new().unwrap();
    sortdrill_cmd(home.path())
        .args(["play", "--values", "5,3,4", "--delay-ms", "0", "--format", "text"])
        .write_stdin("swap\nswap\nskip\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compare 5 and 3: swap or skip?"))
        .stdout(predicate::str::contains("Sorted!"))
        .stdout(predicate::str::contains(
            "summary complete=true attempts=3 accepted=3 mistakes=0 hints=0",
        ));
}

#[test]
fn wrong_answer_is_explained_and_repeated() {
    let home = TempDir::new().unwrap();
    let output = sortdrill_cmd(home.path())
        .args([
            "play",
            "--algorithm",
            "selection",
            "--convergence",
            "left",
            "--values",
            "4,1,3",
            "--delay-ms",
            "0",
            "--format",
            "json",
        ])
        .write_stdin("0\n1\nquit\n")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "play failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let events = json_lines(&output.stdout);
    assert_eq!(events[0]["event"], "prompt");
    assert_eq!(events[0]["kind"]["type"], "select");
    assert_eq!(events[1]["event"], "rejected");
    assert_eq!(events[1]["code"], "E1004");
    assert_eq!(events[1]["title"], "Not the extremal element");
    assert_eq!(
        events[1]["message"],
        "not the extremal element: picked 4, expected 1"
    );
    assert_eq!(events[2]["event"], "prompt");
    assert_eq!(events[2]["values"], serde_json::json!([1, 4, 3]));
    let summary = events.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["mistakes"], 1);
    assert_eq!(summary["complete"], false);
}

#[test]
fn insertion_pick_then_place() {
    let home = TempDir::new().unwrap();
    let output = sortdrill_cmd(home.path())
        .args([
            "play",
            "--algorithm",
            "insertion",
            "--values",
            "2,5,1",
            "--delay-ms",
            "0",
            "--format",
            "json",
        ])
        .write_stdin("1\n1\n0\n1\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = json_lines(&output.stdout);
    let last_prompt = events
        .iter()
        .rev()
        .find(|event| event["event"] == "prompt")
        .unwrap();
    assert_eq!(last_prompt["kind"]["type"], "complete");
    assert_eq!(last_prompt["values"], serde_json::json!([1, 2, 5]));
}

#[test]
fn config_file_and_env_feed_the_session() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("quiz.toml");
    fs::write(
        &config,
        "[session]\nalgorithm = \"selection\"\norder = \"descending\"\n",
    )
    .unwrap();

    let output = sortdrill_cmd(home.path())
        .env("SORTDRILL_CONVERGENCE", "left")
        .args(["solve", "--values", "3,9,4", "--format", "json"])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let solved: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(solved["algorithm"], "selection");
    assert_eq!(solved["order"], "descending");
    assert_eq!(solved["convergence"], "left");
    assert_eq!(solved["final_values"], serde_json::json!([9, 4, 3]));
    assert_eq!(solved["decisions"], 2);
}

#[test]
fn flags_beat_environment() {
    let home = TempDir::new().unwrap();
    let output = sortdrill_cmd(home.path())
        .env("SORTDRILL_ORDER", "descending")
        .args(["solve", "--order", "asc", "--values", "3,1,2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let solved: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(solved["final_values"], serde_json::json!([1, 2, 3]));
}

#[test]
fn seeded_solve_is_reproducible() {
    let home = TempDir::new().unwrap();
    let run = || {
        sortdrill_cmd(home.path())
            .args(["solve", "--seed", "11", "--length", "9", "--format", "json"])
            .output()
            .unwrap()
            .stdout
    };
    let first: Value = serde_json::from_slice(&run()).unwrap();
    let second: Value = serde_json::from_slice(&run()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["initial"].as_array().map(Vec::len), Some(9));
    // Bubble default: n(n-1)/2 decisions.
    assert_eq!(first["decisions"], 36);
}

#[test]
fn out_of_range_length_fails() {
    let home = TempDir::new().unwrap();
    sortdrill_cmd(home.path())
        .args(["solve", "--length", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session.length"));
}

#[test]
fn bad_environment_override_fails() {
    let home = TempDir::new().unwrap();
    sortdrill_cmd(home.path())
        .env("SORTDRILL_ALGORITHM", "quick")
        .args(["solve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SORTDRILL_ALGORITHM"));
}

#[test]
fn completions_are_generated() {
    let home = TempDir::new().unwrap();
    sortdrill_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sortdrill"));
}
