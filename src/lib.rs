// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Hierarchical logging for integration-test drivers.
//!
//! A run writes either a nested XML log (with a live console mirror) or a
//! JUnit report with one test case per subtest. See [`logging::Logger`].

pub mod config;
pub mod logging;

pub use config::{ConfigError, LoggerConfig};
pub use logging::{Attributes, BackendKind, LogError, Logger};
