// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Logger configuration.
//!
//! Settings come from environment-style key/value pairs or from a JSON5
//! file (comments and trailing commas allowed):
//!
//! ```json5
//! {
//!     backend: "junit",
//!     junit_file: "report.xml",
//!     print_serial_logs: false, // quiet console
//! }
//! ```

use crate::logging::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Path of the nested XML log
pub const ENV_LOGFILE: &str = "LOGFILE";
/// Path of the JUnit report
pub const ENV_LOGFILE_JUNIT: &str = "LOGFILE_JUNIT";
/// Backend name: `xml`, `junit` or `noop`
pub const ENV_BACKEND: &str = "TESTLOG_BACKEND";
/// Whether serial console lines are echoed
pub const ENV_SERIAL: &str = "TESTLOG_SERIAL";

const DEFAULT_SUITE_NAME: &str = "test run";

/// Everything needed to construct a backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Backend installed at startup
    pub backend: BackendKind,

    /// XML log destination; discarded when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logfile: Option<PathBuf>,

    /// JUnit report destination; discarded when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub junit_file: Option<PathBuf>,

    /// Initial state of the serial echo toggle
    pub print_serial_logs: bool,

    /// `name` of the JUnit `testsuite` element
    pub suite_name: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Xml,
            logfile: None,
            junit_file: None,
            print_serial_logs: true,
            suite_name: DEFAULT_SUITE_NAME.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    ///
    /// Missing and empty values leave the default in place.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_LOGFILE) {
            config.logfile = Some(PathBuf::from(path));
        }
        if let Some(path) = get(ENV_LOGFILE_JUNIT) {
            config.junit_file = Some(PathBuf::from(path));
        }
        if let Some(name) = get(ENV_BACKEND) {
            config.backend = name.parse()?;
        }
        if let Some(value) = get(ENV_SERIAL) {
            config.print_serial_logs = parse_bool(ENV_SERIAL, &value)?;
        }
        Ok(config)
    }

    /// Load configuration from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Pretty-printed JSON, which is also valid JSON5
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown backend '{0}' (expected xml, junit or noop)")]
    UnknownBackend(String),

    #[error("failed to read config file '{}': {}", .0.display(), .1)]
    IoError(PathBuf, String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid boolean '{value}' for {key}")]
    InvalidBool { key: String, value: String },
}
