// SPDX-License-Identifier: Apache-2.0 OR MIT
// Interchangeable logging backends behind the facade

use super::entry::Attributes;
use super::error::LogError;
use super::severity::Severity;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which backend the facade should run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Nested XML log file plus console mirror
    #[default]
    Xml,
    /// Per-test-case aggregation into a JUnit report
    Junit,
    /// Discard everything
    Noop,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::Xml => "xml",
            BackendKind::Junit => "junit",
            BackendKind::Noop => "noop",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(BackendKind::Xml),
            "junit" => Ok(BackendKind::Junit),
            "noop" | "none" => Ok(BackendKind::Noop),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// What the facade must do after a backend has handled an `error` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keep running; the failure (if any) is on record
    Continue,
    /// The run must stop now with a non-zero exit status
    Terminate,
}

/// Capability set shared by every backend
///
/// All methods take `&self`: serial producers call [`log_serial`] from
/// background threads while the foreground thread logs, so backends keep
/// their mutable state behind their own locks.
///
/// Scope methods come in matched pairs. The facade's guards guarantee
/// every `enter_*` is followed by exactly one `exit_*` on the same backend.
///
/// [`log_serial`]: LogBackend::log_serial
pub trait LogBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Foreground message at `info` or `warning` severity
    fn log(&self, severity: Severity, message: &str, attributes: &Attributes);

    /// Foreground failure message
    fn error(&self, message: &str, attributes: &Attributes) -> Disposition;

    /// Serial console line from a background producer
    fn log_serial(&self, message: &str, machine: &str);

    fn enter_nest(&self, message: &str, attributes: &Attributes);

    fn exit_nest(&self, message: &str, elapsed: Duration);

    /// Enter a subtest scope, returning the name it replaced as current
    fn enter_subtest(&self, name: &str, attributes: &Attributes) -> Option<String> {
        self.enter_nest(name, attributes);
        None
    }

    /// Leave a subtest scope, restoring `previous` as current
    fn exit_subtest(&self, name: &str, _previous: Option<String>, elapsed: Duration) {
        self.exit_nest(name, elapsed);
    }

    /// Runtime toggle for echoing serial console lines
    fn set_print_serial_logs(&self, _enabled: bool) {}

    /// Release all resources; calls after the first are no-ops
    fn close(&self) -> Result<(), LogError>;
}

/// Backend that drops every call
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackend;

impl LogBackend for NoopBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Noop
    }

    fn log(&self, _severity: Severity, _message: &str, _attributes: &Attributes) {}

    fn error(&self, _message: &str, _attributes: &Attributes) -> Disposition {
        Disposition::Continue
    }

    fn log_serial(&self, _message: &str, _machine: &str) {}

    fn enter_nest(&self, _message: &str, _attributes: &Attributes) {}

    fn exit_nest(&self, _message: &str, _elapsed: Duration) {}

    fn close(&self) -> Result<(), LogError> {
        Ok(())
    }
}
