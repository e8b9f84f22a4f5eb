//! Append-only message log.
//!
//! Entries are stored in an `im::Vector`, so a snapshot is an O(1) clone
//! that later appends never touch. Every append publishes the new length on
//! a `watch` channel; waiters compare it with their cursor.

use std::sync::{PoisonError, RwLock};

use im::Vector;
use tokio::sync::watch;
use tracing::debug;

use crate::core::{Message, NewMessage};

/// The shared, totally ordered message history.
#[derive(Debug)]
pub struct MessageLog {
    entries: RwLock<Vector<Message>>,
    length: watch::Sender<u64>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        let (length, _) = watch::channel(0);
        Self {
            entries: RwLock::new(Vector::new()),
            length,
        }
    }

    /// Sequence and append a judged message. Returns its index.
    ///
    /// Appends are serialized by the write lock; indices are gapless and
    /// strictly increasing.
    pub fn append(&self, new: NewMessage) -> u64 {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let sequence = entries.len() as u64;
        entries.push_back(Message::from_new(sequence, new));
        // Publish while still holding the lock so lengths are sent in order
        self.length.send_replace(sequence + 1);
        debug!(sequence, "message appended");
        sequence
    }

    /// Number of messages appended so far.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-blocking check that the log holds at least `n` messages.
    #[must_use]
    pub fn length_at_least(&self, n: u64) -> bool {
        self.len() >= n
    }

    /// Consistent copy of the whole log.
    #[must_use]
    pub fn snapshot(&self) -> Vector<Message> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Copy of the log from index `from` onwards.
    #[must_use]
    pub fn snapshot_from(&self, from: u64) -> Vector<Message> {
        let snapshot = self.snapshot();
        let from = (from as usize).min(snapshot.len());
        snapshot.skip(from)
    }

    /// Watch the log length. The current value is available immediately.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.length.subscribe()
    }
}
