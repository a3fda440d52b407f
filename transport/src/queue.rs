//! Joinable message queue shared by every peer of a session.
//!
//! Provides FIFO ordering with an optional capacity limit, plus a count of
//! outstanding work items. The count goes up on every successful put and
//! down on every `task_done`; `join` waits for it to reach zero.

use crossbeam_channel::{Receiver, SendTimeoutError, Sender};
use ipc::{ChannelId, Message};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Queue error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueueError {
    /// The put timed out on a full queue. The message is handed back.
    #[error("Queue full, could not enqueue {0}")]
    Full(Message),

    /// `task_done` was called more times than items were put.
    #[error("task_done called more times than items were enqueued")]
    TaskDoneUnderflow,
}

/// A multi-producer, multi-consumer queue with drain tracking
///
/// This is the seam peers are written against, so another primitive (an
/// OS-level queue, a broker connection) can stand in for [`SharedQueue`].
///
/// # Invariants
/// - Every item returned by `try_get` must be paired with exactly one
///   `task_done`, whether the caller keeps the item or puts it back.
/// - `try_get` never blocks.
pub trait JoinableQueue: Send + Sync {
    /// Enqueues a message, waiting up to `timeout` for room.
    fn put(&self, message: Message, timeout: Duration) -> Result<(), QueueError>;

    /// Dequeues the head message if there is one.
    fn try_get(&self) -> Option<Message>;

    /// Marks one previously dequeued item as fully processed.
    fn task_done(&self) -> Result<(), QueueError>;

    /// Blocks until every enqueued item has been marked done.
    fn join(&self);

    /// Returns the number of queued messages.
    fn len(&self) -> usize;

    /// Returns whether the queue is empty. Racy under concurrent producers.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of items put but not yet marked done.
    fn unfinished(&self) -> usize;

    /// Returns the identity of this queue.
    fn channel_id(&self) -> ChannelId;
}

impl<Q: JoinableQueue + ?Sized> JoinableQueue for Arc<Q> {
    fn put(&self, message: Message, timeout: Duration) -> Result<(), QueueError> {
        (**self).put(message, timeout)
    }

    fn try_get(&self) -> Option<Message> {
        (**self).try_get()
    }

    fn task_done(&self) -> Result<(), QueueError> {
        (**self).task_done()
    }

    fn join(&self) {
        (**self).join()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn unfinished(&self) -> usize {
        (**self).unfinished()
    }

    fn channel_id(&self) -> ChannelId {
        (**self).channel_id()
    }
}

/// In-memory joinable queue over a crossbeam MPMC channel.
#[derive(Debug)]
pub struct SharedQueue {
    id: ChannelId,
    capacity: Option<usize>,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    unfinished: Mutex<usize>,
    all_done: Condvar,
}

impl SharedQueue {
    /// Creates a queue holding at most `capacity` messages.
    ///
    /// A capacity of 0 means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver, capacity) = if capacity == 0 {
            let (tx, rx) = crossbeam_channel::unbounded();
            (tx, rx, None)
        } else {
            let (tx, rx) = crossbeam_channel::bounded(capacity);
            (tx, rx, Some(capacity))
        };

        Self {
            id: ChannelId::new(),
            capacity,
            sender,
            receiver,
            unfinished: Mutex::new(0),
            all_done: Condvar::new(),
        }
    }

    /// Creates an unbounded queue.
    pub fn unbounded() -> Self {
        Self::with_capacity(0)
    }

    /// Returns the configured capacity, or `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn lock_unfinished(&self) -> MutexGuard<'_, usize> {
        // The counter is a plain integer; a panic elsewhere cannot leave it torn.
        self.unfinished.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish_one(&self) -> Result<(), QueueError> {
        let mut unfinished = self.lock_unfinished();
        if *unfinished == 0 {
            return Err(QueueError::TaskDoneUnderflow);
        }
        *unfinished -= 1;
        if *unfinished == 0 {
            self.all_done.notify_all();
        }
        Ok(())
    }
}

impl Default for SharedQueue {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl JoinableQueue for SharedQueue {
    fn put(&self, message: Message, timeout: Duration) -> Result<(), QueueError> {
        // Count the item before it becomes visible so a fast consumer's
        // task_done can never run ahead of the increment.
        *self.lock_unfinished() += 1;

        match self.sender.send_timeout(message, timeout) {
            Ok(()) => Ok(()),
            // The receiver lives inside this queue, so disconnection cannot
            // happen while `self` is alive; treat it like a full queue.
            Err(SendTimeoutError::Timeout(message))
            | Err(SendTimeoutError::Disconnected(message)) => {
                self.finish_one()?;
                Err(QueueError::Full(message))
            }
        }
    }

    fn try_get(&self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }

    fn task_done(&self) -> Result<(), QueueError> {
        let result = self.finish_one();
        if result.is_err() {
            tracing::warn!(channel = %self.id, "task_done called on a drained queue");
        }
        result
    }

    fn join(&self) {
        let mut unfinished = self.lock_unfinished();
        while *unfinished > 0 {
            unfinished = self
                .all_done
                .wait(unfinished)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn len(&self) -> usize {
        self.receiver.len()
    }

    fn unfinished(&self) -> usize {
        *self.lock_unfinished()
    }

    fn channel_id(&self) -> ChannelId {
        self.id
    }
}
