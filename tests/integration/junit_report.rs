// SPDX-License-Identifier: Apache-2.0 OR MIT
//! JUnit reports written to disk through the facade.

use super::tests::element_names;
use anyhow::Result;
use testlog::attrs;
use testlog::logging::{BackendKind, Logger};
use testlog::LoggerConfig;

fn junit_logger(dir: &tempfile::TempDir) -> Result<Logger> {
    let config = LoggerConfig {
        backend: BackendKind::Junit,
        junit_file: Some(dir.path().join("junit.xml")),
        suite_name: "vm tests".to_string(),
        ..LoggerConfig::default()
    };
    Ok(Logger::new(config)?)
}

#[test]
fn test_report_lists_cases_in_creation_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let logger = junit_logger(&dir)?;

    logger.info("setting up", &attrs!());
    logger.in_subtest("boot", &attrs!(), || logger.log("ok", &attrs!()));
    logger.in_subtest("network", &attrs!(), || {
        logger.in_nested("ping", &attrs!("machine" => "client"), || {
            logger.warning("packet loss", &attrs!());
        });
        logger.error("unreachable", &attrs!());
    });
    logger.in_subtest("boot", &attrs!(), || logger.log("still ok", &attrs!()));
    logger.close()?;

    let xml = std::fs::read_to_string(dir.path().join("junit.xml"))?;
    let names = element_names(&xml);
    assert_eq!(names[..2], ["testsuites", "testsuite"]);
    assert_eq!(names.iter().filter(|n| *n == "testcase").count(), 3);
    assert_eq!(names.iter().filter(|n| *n == "failure").count(), 1);

    let main = xml.find("name=\"main\"").unwrap();
    let boot = xml.find("name=\"boot\"").unwrap();
    let network = xml.find("name=\"network\"").unwrap();
    assert!(main < boot && boot < network);

    assert!(xml.contains("name=\"vm tests\""));
    assert!(xml.contains("tests=\"3\""));
    assert!(xml.contains("failures=\"1\""));
    assert!(xml.contains("<system-out>ok\nstill ok\n</system-out>"));
    assert!(xml.contains("<system-out>ping\npacket loss\n</system-out>"));
    assert!(xml.contains("<system-err>unreachable\n</system-err>"));
    Ok(())
}

#[test]
fn test_failure_marker_only_on_failed_case() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let logger = junit_logger(&dir)?;
    logger.in_subtest("passes", &attrs!(), || logger.log("fine", &attrs!()));
    logger.in_subtest("fails", &attrs!(), || logger.error("disk full", &attrs!()));
    logger.info("process keeps running", &attrs!());
    logger.close()?;

    let xml = std::fs::read_to_string(dir.path().join("junit.xml"))?;
    let passes = xml.find("name=\"passes\"").unwrap();
    let fails = xml.find("name=\"fails\"").unwrap();
    let failure = xml.find("<failure").unwrap();
    assert!(passes < fails && fails < failure);
    assert_eq!(xml.matches("<failure").count(), 1);
    assert!(xml.contains("process keeps running"));
    Ok(())
}

#[test]
fn test_serial_lines_land_in_current_case() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let logger = junit_logger(&dir)?;
    logger.in_subtest("login", &attrs!(), || {
        logger.log_serial("\x1b[32mWelcome\x1b[0m", "server");
        logger.set_print_serial_logs(false);
        logger.log_serial("not recorded", "server");
    });
    logger.close()?;

    let xml = std::fs::read_to_string(dir.path().join("junit.xml"))?;
    assert!(xml.contains("<system-out>server # [32mWelcome[0m\n</system-out>"));
    assert!(!xml.contains("not recorded"));
    Ok(())
}
