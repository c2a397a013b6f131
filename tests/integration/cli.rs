//! End-to-end tests for the command-line binary

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

use crate::support::feed_stub::{closed_port_url, published, typical_feed, FeedStub};

const BIN: &str = "exchange-rate-downloader";

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_lists_flags() {
    let output = Command::cargo_bin(BIN).unwrap().arg("--help").assert().success();
    let text = stdout_of(output.get_output());
    for flag in ["--currency", "--days", "--start-date", "--no-interactive", "--csv-output"] {
        assert!(text.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn test_out_of_range_days_rejected_before_any_work() {
    let temp_dir = TempDir::new().unwrap();

    for days in ["0", "32", "seven"] {
        Command::cargo_bin(BIN)
            .unwrap()
            .current_dir(temp_dir.path())
            .args(["--no-interactive", "--days", days])
            .assert()
            .failure()
            .code(2);
    }
    assert!(!temp_dir.path().join("data").exists());
}

#[test]
fn test_days_above_configured_maximum_reported_as_usage_error() {
    let output = Command::cargo_bin(BIN)
        .unwrap()
        .args(["--no-interactive", "--days", "32"])
        .assert()
        .failure()
        .code(2);

    let stderr = String::from_utf8_lossy(&output.get_output().stderr).into_owned();
    assert!(stderr.contains("day count 32 is out of range"), "stderr: {stderr}");
}

#[test]
fn test_invalid_currency_flag_rejected() {
    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--no-interactive", "--currency", "US1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_exit_keyword_cancels_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    let output = Command::cargo_bin(BIN)
        .unwrap()
        .current_dir(temp_dir.path())
        .write_stdin("q\n")
        .assert()
        .success();

    let text = stdout_of(output.get_output());
    assert!(text.contains("Currency code [USD]"));
    assert!(text.contains("Cancelled"));
    assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_closed_stdin_cancels_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .current_dir(temp_dir.path())
        .write_stdin("")
        .assert()
        .success();
    assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_non_interactive_run_against_feed() {
    let stub = FeedStub::start(|date_req| (200, typical_feed(&published(date_req)))).await;
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let url = stub.url.clone();

    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin(BIN)
            .unwrap()
            .current_dir(&dir)
            .args([
                "--no-interactive",
                "--currency",
                "eur",
                "--days",
                "3",
                "--start-date",
                "2024-03-04",
                "--feed-url",
                url.as_str(),
            ])
            .assert()
            .success()
            .get_output()
            .clone()
    })
    .await
    .unwrap();

    assert_eq!(stub.requests(), vec!["04/03/2024", "05/03/2024", "06/03/2024"]);
    assert_eq!(
        stdout_of(&output),
        "2024-03-04 | EUR: 99.1821\n2024-03-05 | EUR: 99.1821\n2024-03-06 | EUR: 99.1821\n"
    );

    let csv = fs::read_to_string(temp_dir.path().join("data").join("currency_rates.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("date,currency,value\n2024-03-04,EUR,99.1821\n"));
    assert!(temp_dir.path().join("plots").join("currency_rates.svg").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_interactive_answers_drive_run() {
    let stub = FeedStub::start(|date_req| (200, typical_feed(&published(date_req)))).await;
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let url = stub.url.clone();

    tokio::task::spawn_blocking(move || {
        Command::cargo_bin(BIN)
            .unwrap()
            .current_dir(&dir)
            .args(["--feed-url", url.as_str(), "--no-plot"])
            .write_stdin("jpy\n2\n2024-03-04\n")
            .assert()
            .success();
    })
    .await
    .unwrap();

    assert_eq!(stub.requests(), vec!["04/03/2024", "05/03/2024"]);
    let csv = fs::read_to_string(temp_dir.path().join("data").join("currency_rates.csv")).unwrap();
    assert!(csv.contains("2024-03-05,JPY,0.612345"));
    assert!(!temp_dir.path().join("plots").exists());
}

#[tokio::test]
async fn test_unreachable_feed_exits_with_failure() {
    let url = closed_port_url().await;
    let temp_dir = TempDir::new().unwrap();

    let output = Command::cargo_bin(BIN)
        .unwrap()
        .current_dir(temp_dir.path())
        .args(["--no-interactive", "--days", "2", "--feed-url", url.as_str()])
        .assert()
        .failure()
        .code(1);

    let stderr = String::from_utf8_lossy(&output.get_output().stderr).into_owned();
    assert!(stderr.contains("network error"), "stderr: {stderr}");
    // Reported once, through the log
    assert_eq!(stderr.matches("Command failed").count(), 1, "stderr: {stderr}");
    assert!(!stderr.contains("Error: "), "stderr: {stderr}");
    assert!(!temp_dir.path().join("data").exists());
}
