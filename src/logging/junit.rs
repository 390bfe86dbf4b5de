// SPDX-License-Identifier: Apache-2.0 OR MIT
//! JUnit backend: per-test-case aggregation of output and failures.
//!
//! Every run has an implicit `main` case. Entering a subtest makes it the
//! current case until the scope ends; output goes to whichever case is
//! current. Nothing is written until the backend is closed, at which point
//! the whole report is serialised in one go.

use super::backend::{BackendKind, Disposition, LogBackend};
use super::destination::Destination;
use super::entry::Attributes;
use super::error::LogError;
use super::sanitize::{sanitise, xml_safe};
use super::severity::Severity;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Name of the case that exists before any subtest is entered
pub const MAIN_CASE: &str = "main";

const FAILURE_MESSAGE: &str = "Test Case failed";

/// Accumulated record of one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseState {
    pub name: String,
    pub stdout: String,
    pub stderr: String,
    pub failure: bool,
    pub elapsed: Duration,
}

impl TestCaseState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stdout: String::new(),
            stderr: String::new(),
            failure: false,
            elapsed: Duration::ZERO,
        }
    }
}

/// Test cases in creation order plus the current-case pointer
#[derive(Debug, Clone)]
pub struct TestReport {
    cases: Vec<TestCaseState>,
    current: usize,
    started: DateTime<Utc>,
}

impl TestReport {
    pub fn new() -> Self {
        Self {
            cases: vec![TestCaseState::new(MAIN_CASE)],
            current: 0,
            started: Utc::now(),
        }
    }

    /// Name of the case currently receiving output
    pub fn current(&self) -> &str {
        &self.cases[self.current].name
    }

    /// Make `name` current, creating it on first entry
    ///
    /// Re-entering an existing case keeps accumulating into it. Returns the
    /// name of the case that was current before.
    pub fn enter_subtest(&mut self, name: &str) -> String {
        let previous = self.current().to_string();
        self.current = self.index_or_insert(name);
        previous
    }

    /// Credit `elapsed` to `name` and make `previous` current again
    pub fn exit_subtest(&mut self, name: &str, previous: &str, elapsed: Duration) {
        if let Some(case) = self.cases.iter_mut().find(|c| c.name == name) {
            case.elapsed += elapsed;
        }
        self.current = self.index_or_insert(previous);
    }

    /// Append to the current case's stdout
    pub fn log(&mut self, text: &str) {
        self.cases[self.current].stdout.push_str(text);
    }

    /// Append to the current case's stderr and mark it failed
    pub fn error(&mut self, text: &str) {
        let case = &mut self.cases[self.current];
        case.stderr.push_str(text);
        case.failure = true;
    }

    pub fn case(&self, name: &str) -> Option<&TestCaseState> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// All cases, `main` first, then in creation order
    pub fn cases(&self) -> &[TestCaseState] {
        &self.cases
    }

    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|c| c.failure).count()
    }

    pub fn total_time(&self) -> Duration {
        self.cases.iter().map(|c| c.elapsed).sum()
    }

    /// Serialise as a JUnit `testsuites` document holding one suite
    pub fn write_xml<W: Write>(&self, suite_name: &str, out: W) -> Result<(), LogError> {
        let tests = self.cases.len().to_string();
        let failures = self.failures().to_string();
        let time = format!("{:.6}", self.total_time().as_secs_f64());
        let timestamp = self.started.format("%Y-%m-%dT%H:%M:%S").to_string();

        let mut writer = Writer::new_with_indent(out, b'\t', 1);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let suites = BytesStart::new("testsuites").with_attributes([
            ("disabled", "0"),
            ("errors", "0"),
            ("failures", failures.as_str()),
            ("tests", tests.as_str()),
            ("time", time.as_str()),
        ]);
        writer.write_event(Event::Start(suites))?;

        let suite = BytesStart::new("testsuite").with_attributes([
            ("disabled", "0"),
            ("errors", "0"),
            ("failures", failures.as_str()),
            ("name", suite_name),
            ("skipped", "0"),
            ("tests", tests.as_str()),
            ("time", time.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);
        writer.write_event(Event::Start(suite))?;

        for case in &self.cases {
            write_case(&mut writer, suite_name, case)?;
        }

        writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
        writer.write_event(Event::End(BytesEnd::new("testsuites")))?;
        let mut out = writer.into_inner();
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn index_or_insert(&mut self, name: &str) -> usize {
        match self.cases.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.cases.push(TestCaseState::new(name));
                self.cases.len() - 1
            }
        }
    }
}

impl Default for TestReport {
    fn default() -> Self {
        Self::new()
    }
}

fn write_case<W: Write>(
    writer: &mut Writer<W>,
    suite_name: &str,
    case: &TestCaseState,
) -> Result<(), LogError> {
    let name = sanitise(&case.name);
    let classname = sanitise(suite_name);
    let time = format!("{:.6}", case.elapsed.as_secs_f64());
    let start = BytesStart::new("testcase").with_attributes([
        ("classname", classname.as_str()),
        ("name", name.as_str()),
        ("time", time.as_str()),
    ]);

    let empty = !case.failure && case.stdout.is_empty() && case.stderr.is_empty();
    if empty {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;

    if case.failure {
        let failure = BytesStart::new("failure")
            .with_attributes([("type", "failure"), ("message", FAILURE_MESSAGE)]);
        writer.write_event(Event::Empty(failure))?;
    }
    for (tag, text) in [("system-out", &case.stdout), ("system-err", &case.stderr)] {
        if text.is_empty() {
            continue;
        }
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        let text = xml_safe(text);
        writer.write_event(Event::Text(BytesText::new(&text)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Backend aggregating output into a [`TestReport`]
///
/// Errors are recorded against the current case and never stop the run.
/// The report is written to the destination on [`close`](LogBackend::close).
pub struct JUnitLogger {
    report: Mutex<TestReport>,
    destination: Mutex<Option<Destination>>,
    suite_name: String,
    print_serial: AtomicBool,
}

impl JUnitLogger {
    pub fn new(destination: Destination, suite_name: impl Into<String>, print_serial: bool) -> Self {
        Self {
            report: Mutex::new(TestReport::new()),
            destination: Mutex::new(Some(destination)),
            suite_name: suite_name.into(),
            print_serial: AtomicBool::new(print_serial),
        }
    }

    /// Copy of the report accumulated so far
    pub fn snapshot(&self) -> TestReport {
        self.lock_report().clone()
    }

    fn lock_report(&self) -> MutexGuard<'_, TestReport> {
        self.report.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogBackend for JUnitLogger {
    fn kind(&self) -> BackendKind {
        BackendKind::Junit
    }

    fn log(&self, _severity: Severity, message: &str, _attributes: &Attributes) {
        self.lock_report().log(&format!("{}\n", message));
    }

    fn error(&self, message: &str, _attributes: &Attributes) -> Disposition {
        self.lock_report().error(&format!("{}\n", message));
        Disposition::Continue
    }

    fn log_serial(&self, message: &str, machine: &str) {
        if !self.print_serial.load(Ordering::Relaxed) {
            return;
        }
        let line = format!("{} # {}\n", machine, sanitise(message));
        self.lock_report().log(&line);
    }

    fn enter_nest(&self, message: &str, _attributes: &Attributes) {
        self.lock_report().log(&format!("{}\n", message));
    }

    fn exit_nest(&self, _message: &str, _elapsed: Duration) {}

    fn enter_subtest(&self, name: &str, _attributes: &Attributes) -> Option<String> {
        Some(self.lock_report().enter_subtest(name))
    }

    fn exit_subtest(&self, name: &str, previous: Option<String>, elapsed: Duration) {
        let previous = previous.as_deref().unwrap_or(MAIN_CASE);
        self.lock_report().exit_subtest(name, previous, elapsed);
    }

    fn set_print_serial_logs(&self, enabled: bool) {
        self.print_serial.store(enabled, Ordering::Relaxed);
    }

    fn close(&self) -> Result<(), LogError> {
        let destination = self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(destination) = destination else {
            return Ok(());
        };
        self.lock_report().write_xml(&self.suite_name, destination)
    }
}
