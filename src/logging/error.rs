// SPDX-License-Identifier: Apache-2.0 OR MIT
// Error taxonomy for the logging backends

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by backend construction and finalisation
///
/// Best-effort output (console mirroring, individual XML lines) never
/// produces these; only opening a destination and finalising a document do.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("failed to open log destination '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
