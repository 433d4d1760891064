//! Integration tests for the `notch` CLI.
//!
//! Each test writes tables into a temp directory, runs `notch` as a
//! subprocess there, and checks stdout, stderr and the exit status. The
//! interactive commands are only exercised on paths that fail before the
//! terminal UI starts.

use std::fs;
use std::path::Path;
use std::process::Command;

const ATTEMPTS: &str = "\
attempt_number,attempt_start_time,attempt_end_time,attempt_start_frame,attempt_end_frame,attempt_cross_time,attempt_cross_frame
1,0.3333333333333333,0.6666666666666666,10,20,0.5,15
2,1,2,30,60,,
";

/// Run `notch` with the given args in the given directory, returning (stdout, stderr, success).
fn run_notch(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_notch"))
        .args(args)
        .current_dir(dir)
        .env_remove("NOTCH_LOG")
        .output()
        .expect("failed to run notch");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `notch` expecting success, return stdout.
fn run_notch_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_notch(dir, args);
    if !success {
        panic!(
            "notch {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `notch` expecting failure, return stderr.
fn run_notch_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_notch(dir, args);
    if success {
        panic!("notch {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn test_list_attempts() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("a.csv"), ATTEMPTS).unwrap();

    let out = run_notch_ok(tmp.path(), &["list", "a.csv"]);
    assert!(out.contains("#1   frames 10\u{2013}20"));
    assert!(out.contains("cross 15"));
    assert!(out.contains("2 attempt(s)"));
}

#[test]
fn test_list_attempts_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("a.csv"), ATTEMPTS).unwrap();

    let out = run_notch_ok(tmp.path(), &["list", "a.csv", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let attempts = value.as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["cross_frame"], 15);
    assert_eq!(attempts[1]["end_time"], 2.0);
}

#[test]
fn test_list_classifications_latest_wins() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("c.csv"),
        "\
attempt_number,attempt_start_time,attempt_end_time,attempt_start_frame,attempt_end_frame,attempt_cross_time,attempt_cross_frame,ground_truth_block_drop,is_flagged,reason_for_flag
1,0.1,0.2,3,6,,,1,0,
1,0.1,0.2,3,6,,,5,1,\"slipped, twice\"
",
    )
    .unwrap();

    let out = run_notch_ok(tmp.path(), &["list", "c.csv", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["code"], 5);
    assert_eq!(rows[0]["reason"], "slipped, twice");
}

#[test]
fn test_list_missing_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_notch_err(tmp.path(), &["list", "nope.csv"]);
    assert!(err.contains("error:"));
    assert!(err.contains("not found"));
}

// ---------------------------------------------------------------------------
// marker / classifier startup failures
// ---------------------------------------------------------------------------

#[test]
fn test_marker_missing_video() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_notch_err(tmp.path(), &["marker", "absent.mp4"]);
    assert!(err.contains("absent.mp4"));
    assert!(err.contains("not found"));
    assert!(!tmp.path().join("absent_attempt_ground_truths.csv").exists());
}

#[test]
fn test_classifier_missing_csv() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_notch_err(tmp.path(), &["classifier", "missing.csv", "absent.mp4"]);
    assert!(err.contains("missing.csv"));
}

#[test]
fn test_classifier_reports_columns_before_video() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.csv"), "foo,bar\n1,2\n").unwrap();

    let err = run_notch_err(tmp.path(), &["classifier", "bad.csv", "absent.mp4"]);
    assert!(err.contains("missing required column"));
    assert!(!err.contains("absent.mp4"));
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn test_invalid_config_is_fatal() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("a.csv"), ATTEMPTS).unwrap();
    fs::write(tmp.path().join("notch.toml"), "[marker]\nlarge_step = \"ten\"\n").unwrap();

    let err = run_notch_err(tmp.path(), &["list", "a.csv"]);
    assert!(err.contains("notch.toml"));
}

#[test]
fn test_explicit_config_must_exist() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("a.csv"), ATTEMPTS).unwrap();

    let err = run_notch_err(tmp.path(), &["list", "a.csv", "--config", "other.toml"]);
    assert!(err.contains("other.toml"));
}

#[test]
fn test_log_file_written_to_output_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("a.csv"), ATTEMPTS).unwrap();
    fs::write(
        tmp.path().join("notch.toml"),
        "[output]\ndir = \"out\"\n\n[log]\nfile = \"run.log\"\n",
    )
    .unwrap();

    run_notch_err(tmp.path(), &["marker", "absent.mp4"]);
    let log = fs::read_to_string(tmp.path().join("out/run.log")).unwrap();
    assert!(log.contains("command failed"));
}
