// SPDX-License-Identifier: Apache-2.0 OR MIT
// Lock-free FIFO for serial console lines produced off the foreground thread

use super::entry::LogEntry;
use crossbeam_queue::SegQueue;
use std::sync::Arc;

/// Multi-producer queue of pending serial entries
///
/// Producers call [`enqueue`](Self::enqueue) from any thread without ever
/// blocking; the foreground writer calls [`drain`](Self::drain) at every
/// synchronization point. Clones share the same underlying queue.
#[derive(Clone, Default)]
pub struct MessageQueue {
    inner: Arc<SegQueue<LogEntry>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; never blocks
    pub fn enqueue(&self, entry: LogEntry) {
        self.inner.push(entry);
    }

    /// Remove and return everything currently queued, oldest first
    ///
    /// Entries pushed concurrently with a drain are either included or left
    /// for the next drain; none are lost or reordered.
    pub fn drain(&self) -> Vec<LogEntry> {
        let mut drained = Vec::with_capacity(self.inner.len());
        while let Some(entry) = self.inner.pop() {
            drained.push(entry);
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageQueue")
            .field("len", &self.len())
            .finish()
    }
}
