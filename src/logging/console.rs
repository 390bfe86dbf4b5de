// SPDX-License-Identifier: Apache-2.0 OR MIT
// Human-readable mirror of every message on the diagnostic stream

use super::destination::{self, Destination};
use super::entry::Attributes;
use colored::Colorize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Writes one styled line per message to stderr (or any destination)
///
/// Output errors are swallowed: mirroring must never fail the caller.
pub struct ConsoleMirror {
    out: Mutex<Destination>,
    print_serial: AtomicBool,
}

impl ConsoleMirror {
    pub fn new(out: Destination, print_serial: bool) -> Self {
        Self {
            out: Mutex::new(out),
            print_serial: AtomicBool::new(print_serial),
        }
    }

    /// Mirror to the process's stderr
    pub fn stderr(print_serial: bool) -> Self {
        Self::new(destination::stderr(), print_serial)
    }

    /// Plain message, prefixed with the machine name if one is attached
    pub fn mirror(&self, message: &str, attributes: &Attributes) {
        self.emit(&maybe_prefix(message, attributes));
    }

    /// Header of a nested scope, emphasised
    pub fn mirror_header(&self, message: &str, attributes: &Attributes) {
        let styled = message.bright_green().bold().to_string();
        self.emit(&maybe_prefix(&styled, attributes));
    }

    /// Serial console line, dimmed; suppressed while serial printing is off
    pub fn mirror_serial(&self, message: &str, machine: &str) {
        if !self.print_serial() {
            return;
        }
        let line = format!("{} # {}", machine, message);
        self.emit(&line.dimmed().to_string());
    }

    pub fn set_print_serial(&self, enabled: bool) {
        self.print_serial.store(enabled, Ordering::Relaxed);
    }

    pub fn print_serial(&self) -> bool {
        self.print_serial.load(Ordering::Relaxed)
    }

    fn emit(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// `"<machine>: <message>"` when a machine is attached, else the message
pub fn maybe_prefix(message: &str, attributes: &Attributes) -> String {
    match attributes.machine_name() {
        Some(machine) => format!("{}: {}", machine, message),
        None => message.to_string(),
    }
}
