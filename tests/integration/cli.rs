// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Integration tests for the `testlog` replay binary.

use super::tests::element_names;
use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, script: &str, args: &[&str]) -> Result<Output> {
    let script_path = dir.join("script.json");
    std::fs::write(&script_path, script)?;
    let output = Command::new(env!("CARGO_BIN_EXE_testlog"))
        .env_remove("LOGFILE")
        .env_remove("LOGFILE_JUNIT")
        .env_remove("TESTLOG_BACKEND")
        .env_remove("TESTLOG_SERIAL")
        .args(args)
        .arg(&script_path)
        .output()?;
    Ok(output)
}

/// **Passing Test:** a fatal error under the XML backend exits with status 1
/// and leaves a complete document behind.
#[test]
#[cfg_attr(tarpaulin, ignore)]
fn test_fatal_error_exits_nonzero() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let logfile = dir.path().join("log.xml");
    let output = run(
        dir.path(),
        r#"[
            {"op": "nested", "message": "starting", "steps": [
                {"op": "serial", "message": "booting", "machine": "vm"},
                {"op": "error", "message": "disk full", "attrs": {"machine": "vm"}},
                {"op": "info", "message": "never reached"}
            ]}
        ]"#,
        &["--logfile", logfile.to_str().unwrap()],
    )?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("vm: disk full"));
    assert!(!stderr.contains("never reached"));

    let xml = std::fs::read_to_string(&logfile)?;
    assert_eq!(element_names(&xml), vec!["logfile", "nest", "head", "line", "line"]);
    assert!(xml.contains("booting"));
    assert!(xml.contains("disk full"));
    Ok(())
}

/// **Passing Test:** under the JUnit backend an error is recorded and the
/// run completes successfully.
#[test]
#[cfg_attr(tarpaulin, ignore)]
fn test_junit_error_is_not_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let report = dir.path().join("junit.xml");
    let output = run(
        dir.path(),
        r#"[
            {"op": "subtest", "name": "boot", "steps": [{"op": "log", "message": "ok"}]},
            {"op": "error", "message": "disk full"},
            {"op": "info", "message": "after the failure"}
        ]"#,
        &["--backend", "junit", "--junit", report.to_str().unwrap()],
    )?;

    assert!(output.status.success());
    let xml = std::fs::read_to_string(&report)?;
    assert!(xml.contains("name=\"boot\""));
    assert!(xml.contains("<system-err>disk full\n</system-err>"));
    assert!(xml.contains("after the failure"));
    assert_eq!(xml.matches("<failure").count(), 1);
    Ok(())
}

/// **Passing Test:** switching backend mid-script finalises both files.
#[test]
#[cfg_attr(tarpaulin, ignore)]
fn test_select_step_switches_backend() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let logfile = dir.path().join("log.xml");
    let report = dir.path().join("junit.xml");
    let output = run(
        dir.path(),
        r#"[
            {"op": "info", "message": "xml phase"},
            {"op": "select", "backend": "junit"},
            {"op": "info", "message": "junit phase"}
        ]"#,
        &[
            "--logfile",
            logfile.to_str().unwrap(),
            "--junit",
            report.to_str().unwrap(),
            "--no-serial",
        ],
    )?;

    assert!(output.status.success());
    let xml = std::fs::read_to_string(&logfile)?;
    assert_eq!(element_names(&xml), vec!["logfile", "line"]);
    let junit = std::fs::read_to_string(&report)?;
    assert!(junit.contains("junit phase"));
    assert!(!junit.contains("xml phase"));
    Ok(())
}

/// **Passing Test:** a malformed script is reported, not replayed.
#[test]
#[cfg_attr(tarpaulin, ignore)]
fn test_bad_script_fails_cleanly() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = run(dir.path(), r#"[{"op": "shout"}]"#, &[])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse script"));
    Ok(())
}
