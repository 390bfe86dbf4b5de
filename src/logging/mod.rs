// Hierarchical test logging: nested XML log, JUnit report, console mirror
//
// Callers talk to a `Logger` facade, which forwards to exactly one backend:
// - `XmlLogger`: nested XML document plus styled console mirror; serial
//   console lines are queued and flushed at the next synchronous call
// - `JUnitLogger`: per-subtest aggregation written as a JUnit report on close
// - `NoopBackend`: discards everything

mod backend;
mod console;
mod destination;
mod entry;
mod error;
mod facade;
mod junit;
mod lifecycle;
#[macro_use]
mod macros;
mod queue;
mod sanitize;
mod severity;
mod xml_logger;
mod xml_writer;

// Public exports
pub use backend::{BackendKind, Disposition, LogBackend, NoopBackend};
pub use console::{maybe_prefix, ConsoleMirror};
pub use destination::{discard, open_destination, Destination, MemorySink};
pub use entry::{Attributes, EntryKind, LogEntry, MACHINE_KEY, TYPE_KEY};
pub use error::LogError;
pub use facade::{ExitHook, Logger, NestGuard, SubtestGuard, FATAL_EXIT_CODE};
pub use junit::{JUnitLogger, TestCaseState, TestReport, MAIN_CASE};
pub use lifecycle::{build_backend, global, init_global, install_panic_hook, shutdown_global};
pub use queue::MessageQueue;
pub use sanitize::{is_other, sanitise, sanitise_lossy, xml_safe};
pub use severity::Severity;
pub use xml_logger::XmlLogger;
pub use xml_writer::XmlTreeWriter;
