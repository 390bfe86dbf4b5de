// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Backend construction and the process-wide logger.
//!
//! Most code should construct a [`Logger`] and share it by reference. For
//! callers that need a logger reachable from anywhere, [`init_global`]
//! installs one exactly once; [`shutdown_global`] closes its backend and
//! must be called before the process exits normally, since statics are
//! never dropped. [`install_panic_hook`] covers abnormal exits.

use super::backend::{BackendKind, LogBackend, NoopBackend};
use super::console::ConsoleMirror;
use super::destination::open_destination;
use super::error::LogError;
use super::facade::Logger;
use super::junit::JUnitLogger;
use super::xml_logger::XmlLogger;
use crate::config::LoggerConfig;
use std::sync::{Arc, Once, OnceLock};

static GLOBAL: OnceLock<Logger> = OnceLock::new();
static PANIC_HOOK: Once = Once::new();

/// Construct a backend of `kind`, opening its destination from `config`
///
/// Failure to open the destination is fatal and reported to the caller.
pub fn build_backend(
    kind: BackendKind,
    config: &LoggerConfig,
) -> Result<Arc<dyn LogBackend>, LogError> {
    let backend: Arc<dyn LogBackend> = match kind {
        BackendKind::Xml => {
            let destination = open_destination(config.logfile.as_deref())?;
            let console = ConsoleMirror::stderr(config.print_serial_logs);
            Arc::new(XmlLogger::new(destination, console)?)
        }
        BackendKind::Junit => {
            let destination = open_destination(config.junit_file.as_deref())?;
            Arc::new(JUnitLogger::new(
                destination,
                config.suite_name.clone(),
                config.print_serial_logs,
            ))
        }
        BackendKind::Noop => Arc::new(NoopBackend),
    };
    Ok(backend)
}

/// Install the process-wide logger
///
/// Only the first call has an effect; later calls return the logger that
/// is already installed and leave `config` unused.
pub fn init_global(config: LoggerConfig) -> Result<&'static Logger, LogError> {
    if let Some(logger) = GLOBAL.get() {
        return Ok(logger);
    }
    let logger = Logger::new(config)?;
    // A concurrent initialiser may have won; its logger is the one kept and
    // ours is dropped, which closes its backend.
    Ok(GLOBAL.get_or_init(|| logger))
}

/// The process-wide logger, if [`init_global`] has run
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// Close the process-wide logger's backend
///
/// The logger stays installed but discards everything from now on.
pub fn shutdown_global() -> Result<(), LogError> {
    match GLOBAL.get() {
        Some(logger) => logger.close(),
        None => Ok(()),
    }
}

/// Finalise the process-wide logger when a panic unwinds to the hook
///
/// Chains to the previously installed hook. Installing twice is a no-op.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = shutdown_global();
            previous(info);
        }));
    });
}
