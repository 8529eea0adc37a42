use std::process::Command;
use tempfile::TempDir;

fn runner() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pagespeed-journey"));
    cmd.env("RUST_LOG", "info")
        .env_remove("PAGESPEED_API_KEY")
        .env_remove("PAGESPEED_ENDPOINT")
        .env_remove("PAGESPEED_STRATEGY");
    cmd
}

#[test]
fn test_logs_go_to_stderr_and_stdout_stays_json_only() {
    // A directory cannot be opened as a database, so the run stops right after
    // the first log line and before any browser is launched.
    let dir = TempDir::new().unwrap();
    let output = runner()
        .arg("--sqlite")
        .arg(dir.path())
        .arg("https://example.com/")
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.is_empty(), "stdout carried: {stdout}");
    assert!(
        stderr.contains("Scoring 1 context(s) of https://example.com/"),
        "stderr was: {stderr}"
    );
}

#[test]
fn test_invalid_strategy_env_fails_before_any_output() {
    let output = runner()
        .env("PAGESPEED_STRATEGY", "tablet")
        .arg("https://example.com/")
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tablet"));
}
