// SPDX-License-Identifier: Apache-2.0 OR MIT
// Output destinations for the XML document, JUnit report and console mirror

use super::error::LogError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Byte sink owned by exactly one writer
pub type Destination = Box<dyn Write + Send>;

/// Open a file destination, or a discarding one when no path is configured
///
/// Failing to create the file is a fatal initialization error.
pub fn open_destination(path: Option<&Path>) -> Result<Destination, LogError> {
    match path {
        None => Ok(discard()),
        Some(path) => {
            let file = File::create(path).map_err(|source| LogError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

/// Destination that drops everything
pub fn discard() -> Destination {
    Box::new(io::sink())
}

/// Destination writing to the process's diagnostic stream
pub fn stderr() -> Destination {
    Box::new(io::stderr())
}

/// In-memory destination whose contents stay readable after the writer
/// that owns it has been closed
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed clone, ready to hand to a writer
    pub fn destination(&self) -> Destination {
        Box::new(self.clone())
    }

    /// Everything written so far, decoded lossily
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
