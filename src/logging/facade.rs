// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The single entry point callers log through.
//!
//! A [`Logger`] holds exactly one active backend and forwards every call to
//! it unchanged. The backend can be replaced at runtime with
//! [`Logger::select_backend`]; the outgoing backend is closed as part of the
//! switch so its document is left complete.
//!
//! Scopes are RAII guards. [`NestGuard`] and [`SubtestGuard`] keep a handle
//! to the backend they were opened on and close the scope there when
//! dropped, on every exit path, even if the facade has switched backends in
//! the meantime.

use super::backend::{BackendKind, Disposition, LogBackend, NoopBackend};
use super::entry::Attributes;
use super::error::LogError;
use super::lifecycle::build_backend;
use super::sanitize::sanitise_lossy;
use super::severity::Severity;
use crate::config::LoggerConfig;
use std::io::Write;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

/// Called with the exit status when a fatal error ends the run
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Exit status of a run stopped by a fatal error
pub const FATAL_EXIT_CODE: i32 = 1;

pub struct Logger {
    backend: RwLock<Arc<dyn LogBackend>>,
    config: LoggerConfig,
    exit_hook: ExitHook,
}

impl Logger {
    /// Build the backend named by `config.backend` and install it
    pub fn new(config: LoggerConfig) -> Result<Self, LogError> {
        let backend = build_backend(config.backend, &config)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Install an already constructed backend
    pub fn with_backend(config: LoggerConfig, backend: Arc<dyn LogBackend>) -> Self {
        Self {
            backend: RwLock::new(backend),
            config,
            exit_hook: Arc::new(exit_process),
        }
    }

    /// Replace what happens after a fatal error has been recorded
    ///
    /// The default exits the process with [`FATAL_EXIT_CODE`].
    pub fn with_exit_hook(mut self, hook: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit_hook = Arc::new(hook);
        self
    }

    /// Kind of the backend currently installed
    pub fn kind(&self) -> BackendKind {
        self.current().kind()
    }

    /// Close the current backend, then construct a backend of `kind` from
    /// the stored configuration and switch to it
    ///
    /// The outgoing backend is finalised before the new destination is
    /// opened, since both may be the same file. If construction fails the
    /// facade is left discarding everything.
    pub fn select_backend(&self, kind: BackendKind) -> Result<(), LogError> {
        let closed = self.close();
        let backend = build_backend(kind, &self.config)?;
        self.swap(backend);
        closed
    }

    /// Switch to an already constructed `backend`, closing the previous one
    ///
    /// `backend` must not write to a destination the current backend still
    /// owns; use [`select_backend`](Self::select_backend) for that.
    pub fn install_backend(&self, backend: Arc<dyn LogBackend>) -> Result<(), LogError> {
        let previous = self.swap(backend);
        previous.close()
    }

    pub fn info(&self, message: &str, attributes: &Attributes) {
        self.current().log(Severity::Info, message, attributes);
    }

    pub fn warning(&self, message: &str, attributes: &Attributes) {
        self.current().log(Severity::Warning, message, attributes);
    }

    /// Record a failure
    ///
    /// Under the XML backend this is fatal: the backend is closed, leaving a
    /// complete document, and the exit hook runs with [`FATAL_EXIT_CODE`].
    /// Under the JUnit backend the failure is recorded and the run goes on.
    pub fn error(&self, message: &str, attributes: &Attributes) {
        if self.current().error(message, attributes) == Disposition::Terminate {
            if let Err(err) = self.close() {
                let _ = writeln!(std::io::stderr(), "failed to finalise log: {}", err);
            }
            (self.exit_hook)(FATAL_EXIT_CODE);
        }
    }

    pub fn log(&self, message: &str, attributes: &Attributes) {
        self.current().log(Severity::Info, message, attributes);
    }

    /// Line read from a machine's serial console; safe to call from any thread
    pub fn log_serial(&self, message: &str, machine: &str) {
        self.current().log_serial(message, machine);
    }

    /// Raw serial console bytes, decoded lossily
    pub fn log_serial_bytes(&self, bytes: &[u8], machine: &str) {
        self.log_serial(&sanitise_lossy(bytes), machine);
    }

    /// Open a nested scope that lasts until the guard is dropped
    pub fn nested(&self, message: &str, attributes: &Attributes) -> NestGuard {
        let backend = self.current();
        backend.enter_nest(message, attributes);
        NestGuard {
            backend,
            message: message.to_string(),
            started: Instant::now(),
        }
    }

    /// Run `f` inside a nested scope
    pub fn in_nested<T>(&self, message: &str, attributes: &Attributes, f: impl FnOnce() -> T) -> T {
        let _scope = self.nested(message, attributes);
        f()
    }

    /// Open a subtest scope that lasts until the guard is dropped
    pub fn subtest(&self, name: &str, attributes: &Attributes) -> SubtestGuard {
        let backend = self.current();
        let previous = backend.enter_subtest(name, attributes);
        SubtestGuard {
            backend,
            name: name.to_string(),
            previous,
            started: Instant::now(),
        }
    }

    /// Run `f` as subtest `name`
    pub fn in_subtest<T>(&self, name: &str, attributes: &Attributes, f: impl FnOnce() -> T) -> T {
        let _scope = self.subtest(name, attributes);
        f()
    }

    pub fn set_print_serial_logs(&self, enabled: bool) {
        self.current().set_print_serial_logs(enabled);
    }

    /// Close the active backend and fall back to discarding everything
    ///
    /// Each backend is closed at most once, however often this is called.
    pub fn close(&self) -> Result<(), LogError> {
        let previous = self.swap(Arc::new(NoopBackend));
        previous.close()
    }

    fn current(&self) -> Arc<dyn LogBackend> {
        Arc::clone(&self.backend.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn swap(&self, backend: Arc<dyn LogBackend>) -> Arc<dyn LogBackend> {
        let mut slot = self.backend.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, backend)
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("backend", &self.kind())
            .field("config", &self.config)
            .finish()
    }
}

/// Open nested scope; closes the `nest` when dropped
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct NestGuard {
    backend: Arc<dyn LogBackend>,
    message: String,
    started: Instant,
}

impl Drop for NestGuard {
    fn drop(&mut self) {
        self.backend
            .exit_nest(&self.message, self.started.elapsed());
    }
}

/// Open subtest scope; restores the previous test case when dropped
#[must_use = "the subtest ends as soon as the guard is dropped"]
pub struct SubtestGuard {
    backend: Arc<dyn LogBackend>,
    name: String,
    previous: Option<String>,
    started: Instant,
}

impl Drop for SubtestGuard {
    fn drop(&mut self) {
        self.backend
            .exit_subtest(&self.name, self.previous.take(), self.started.elapsed());
    }
}
