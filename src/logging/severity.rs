// SPDX-License-Identifier: Apache-2.0 OR MIT
// Message taxonomy for foreground log calls

use serde::{Deserialize, Serialize};

/// Severity of a synchronous log call
///
/// Serial console lines carry no severity; they are tagged with
/// [`EntryKind::Serial`](super::EntryKind) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Test failure; fatal in XML mode, recorded in JUnit mode
    Error,
    /// Something unexpected that does not fail the run
    Warning,
    /// Normal progress messages
    Info,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
