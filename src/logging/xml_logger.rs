// SPDX-License-Identifier: Apache-2.0 OR MIT
// XML backend: tree writer + serial queue + console mirror

use super::backend::{BackendKind, Disposition, LogBackend};
use super::console::ConsoleMirror;
use super::destination::Destination;
use super::entry::{Attributes, LogEntry};
use super::error::LogError;
use super::queue::MessageQueue;
use super::severity::Severity;
use super::xml_writer::XmlTreeWriter;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Backend writing the nested XML log
///
/// Serial lines are queued by [`log_serial`](LogBackend::log_serial) and
/// written by the foreground thread the next time it touches the document,
/// before its own output, so the tree only ever has one writer.
pub struct XmlLogger {
    writer: Mutex<XmlTreeWriter>,
    queue: MessageQueue,
    console: ConsoleMirror,
}

impl XmlLogger {
    pub fn new(destination: Destination, console: ConsoleMirror) -> Result<Self, LogError> {
        Ok(Self {
            writer: Mutex::new(XmlTreeWriter::new(destination)?),
            queue: MessageQueue::new(),
            console,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.lock_writer().is_closed()
    }

    fn lock_writer(&self) -> MutexGuard<'_, XmlTreeWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn drain_into(&self, writer: &mut XmlTreeWriter) {
        for entry in self.queue.drain() {
            let (message, attributes) = entry.into_parts();
            let _ = writer.write_line(&message, &attributes);
        }
    }

    /// Mirror, drain, then write the line; caller holds the writer lock
    fn write_sync(&self, writer: &mut XmlTreeWriter, message: &str, attributes: &Attributes) {
        self.console.mirror(message, attributes);
        self.drain_into(writer);
        let _ = writer.write_line(message, attributes);
    }
}

impl LogBackend for XmlLogger {
    fn kind(&self) -> BackendKind {
        BackendKind::Xml
    }

    fn log(&self, _severity: Severity, message: &str, attributes: &Attributes) {
        let mut writer = self.lock_writer();
        if writer.is_closed() {
            return;
        }
        self.write_sync(&mut writer, message, attributes);
    }

    fn error(&self, message: &str, attributes: &Attributes) -> Disposition {
        self.log(Severity::Error, message, attributes);
        Disposition::Terminate
    }

    fn log_serial(&self, message: &str, machine: &str) {
        self.queue.enqueue(LogEntry::serial(message, machine));
        self.console.mirror_serial(message, machine);
    }

    fn enter_nest(&self, message: &str, attributes: &Attributes) {
        let mut writer = self.lock_writer();
        if writer.is_closed() {
            return;
        }
        self.console.mirror_header(message, attributes);
        self.drain_into(&mut writer);
        let _ = writer.open_nest(message, attributes);
    }

    fn exit_nest(&self, message: &str, elapsed: Duration) {
        let mut writer = self.lock_writer();
        if writer.is_closed() {
            return;
        }
        let footer = format!(
            "(finished: {}, in {:.2} seconds)",
            message,
            elapsed.as_secs_f64()
        );
        self.write_sync(&mut writer, &footer, &Attributes::new());
        let _ = writer.close_nest();
    }

    fn set_print_serial_logs(&self, enabled: bool) {
        self.console.set_print_serial(enabled);
    }

    fn close(&self) -> Result<(), LogError> {
        let mut writer = self.lock_writer();
        if writer.is_closed() {
            return Ok(());
        }
        self.drain_into(&mut writer);
        writer.close()
    }
}
