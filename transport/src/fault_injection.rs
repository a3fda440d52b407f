//! Deterministic fault injection for queue transports
//!
//! Wraps a real queue and makes puts fail on demand, so backpressure
//! handling can be exercised without racing real producers.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Faults fire on exact attempt counts, never at random
//! - **Transparent**: Everything except the faulted puts reaches the inner queue
//! - **Test-focused**: Not intended for production use
//!
//! ## Example
//!
//! ```
//! use transport::fault_injection::{FaultyQueue, QueueFault};
//! use transport::SharedQueue;
//!
//! let queue = FaultyQueue::new(SharedQueue::unbounded(), QueueFault::FullNext { count: 2 });
//! assert_eq!(queue.put_attempts(), 0);
//! ```

use crate::queue::{JoinableQueue, QueueError};
use ipc::{ChannelId, Message};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// A fault to inject into puts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueFault {
    /// Every put reports a full queue
    AlwaysFull,

    /// The next N puts report a full queue, later ones go through
    FullNext { count: usize },
}

#[derive(Debug)]
struct FaultState {
    fault: QueueFault,
    put_attempts: usize,
    rejected: usize,
}

/// Queue wrapper that applies a [`QueueFault`]
///
/// A rejected put waits out its full timeout before failing, like a put on
/// a genuinely full queue would.
#[derive(Debug)]
pub struct FaultyQueue<Q> {
    inner: Q,
    state: Mutex<FaultState>,
}

impl<Q: JoinableQueue> FaultyQueue<Q> {
    pub fn new(inner: Q, fault: QueueFault) -> Self {
        Self {
            inner,
            state: Mutex::new(FaultState {
                fault,
                put_attempts: 0,
                rejected: 0,
            }),
        }
    }

    /// Returns how many puts were attempted, successful or not
    pub fn put_attempts(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put_attempts
    }

    /// Returns how many puts were rejected by the fault
    pub fn rejected_puts(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rejected
    }

    /// Returns the wrapped queue
    pub fn inner(&self) -> &Q {
        &self.inner
    }

    fn should_reject(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.put_attempts += 1;
        let reject = match state.fault {
            QueueFault::AlwaysFull => true,
            QueueFault::FullNext { count } => state.rejected < count,
        };
        if reject {
            state.rejected += 1;
        }
        reject
    }
}

impl<Q: JoinableQueue> JoinableQueue for FaultyQueue<Q> {
    fn put(&self, message: Message, timeout: Duration) -> Result<(), QueueError> {
        if self.should_reject() {
            thread::sleep(timeout);
            return Err(QueueError::Full(message));
        }
        self.inner.put(message, timeout)
    }

    fn try_get(&self) -> Option<Message> {
        self.inner.try_get()
    }

    fn task_done(&self) -> Result<(), QueueError> {
        self.inner.task_done()
    }

    fn join(&self) {
        self.inner.join()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn unfinished(&self) -> usize {
        self.inner.unfinished()
    }

    fn channel_id(&self) -> ChannelId {
        self.inner.channel_id()
    }
}
