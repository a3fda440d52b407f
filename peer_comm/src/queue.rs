//! Multi-consumer peer
//!
//! Every peer of a session shares one queue. A consumer only keeps the
//! messages its predicate accepts; anything else is re-published to the
//! tail so another consumer gets a chance at it.
//!
//! Per message the lifecycle is:
//!
//! ```text
//! Enqueued -> Dequeued -> Accepted
//!                     \-> Requeued -> Enqueued
//! ```
//!
//! Each dequeue is paired with exactly one `task_done` on the queue, on the
//! accept path and the requeue path alike. A requeued copy counts as a new
//! item and needs its own `task_done` later. That keeps `queue_join`
//! meaningful: it returns once every message has been accepted somewhere.

use crate::config::RetryPolicy;
use crate::error::PeerError;
use crate::peer::Communicator;
use core_types::{PeerId, PeerRole};
use ipc::{Message, MessagePayload};
use std::sync::Arc;
use transport::{JoinableQueue, QueueError};

/// Peer bound to a shared queue
#[derive(Clone)]
pub struct QueuePeer {
    role: PeerRole,
    id: PeerId,
    queue: Arc<dyn JoinableQueue>,
    retry: RetryPolicy,
}

impl QueuePeer {
    pub fn new(role: PeerRole, queue: Arc<dyn JoinableQueue>, retry: RetryPolicy) -> Self {
        Self {
            role,
            id: PeerId::current(),
            queue,
            retry,
        }
    }

    /// Overrides the id stamped on outgoing messages
    pub fn with_id(mut self, id: PeerId) -> Self {
        self.id = id;
        self
    }

    /// Returns this peer's backpressure tolerance
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Sends a request on behalf of `sender`
    ///
    /// Used to re-publish a message exactly as its original sender built it.
    pub fn send_as(
        &self,
        sender: PeerId,
        request: &str,
        recipient: Option<PeerId>,
        payload: Option<MessagePayload>,
    ) -> Result<Message, PeerError> {
        let message = Message::encode(request, sender, recipient, payload)?;
        self.publish(message)
    }

    /// Takes the head of the queue if `predicate` accepts it
    ///
    /// Never blocks. Returns `Ok(None)` when the queue is empty or when the
    /// head message was rejected and put back at the tail. An error means
    /// the rejected message could not be put back; it is carried in the
    /// error rather than dropped.
    pub fn receive_if<F>(&self, predicate: F) -> Result<Option<Message>, PeerError>
    where
        F: Fn(&Message) -> bool,
    {
        let Some(message) = self.queue.try_get() else {
            return Ok(None);
        };

        if predicate(&message) {
            self.queue.task_done()?;
            tracing::debug!(
                pid = %self.id,
                channel = %self.queue.channel_id(),
                request = message.request(),
                sender = %message.sender(),
                "message accepted"
            );
            return Ok(Some(message));
        }

        tracing::debug!(
            pid = %self.id,
            channel = %self.queue.channel_id(),
            request = message.request(),
            "message not for us, requeueing"
        );

        // Requeue before marking done so the outstanding count never dips
        // to zero while the message is in flight.
        let requeued = self.publish(message);
        let done = self.queue.task_done();
        requeued?;
        done?;
        Ok(None)
    }

    /// Takes the head of the queue unconditionally
    pub fn receive_any(&self) -> Result<Option<Message>, PeerError> {
        self.receive_if(|_| true)
    }

    /// Reports whether the queue currently holds no messages
    ///
    /// Best effort: another peer may enqueue right after this returns.
    pub fn queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of messages currently queued
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of items enqueued but not yet accepted
    pub fn outstanding(&self) -> usize {
        self.queue.unfinished()
    }

    /// Blocks until every message ever enqueued has been accepted
    ///
    /// There is no timeout. Call it only once the session has agreed on a
    /// termination protocol, otherwise it may wait forever.
    pub fn queue_join(&self) {
        tracing::debug!(pid = %self.id, channel = %self.queue.channel_id(), "waiting for queue to drain");
        self.queue.join();
    }

    fn publish(&self, message: Message) -> Result<Message, PeerError> {
        let loops = self.retry.loops();
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.queue.put(message.clone(), self.retry.timeout()) {
                Ok(()) => {
                    tracing::debug!(
                        pid = %self.id,
                        role = %self.role,
                        channel = %self.queue.channel_id(),
                        request = message.request(),
                        attempts,
                        "message enqueued"
                    );
                    return Ok(message);
                }
                Err(QueueError::Full(_)) if attempts < loops => {
                    tracing::warn!(
                        pid = %self.id,
                        channel = %self.queue.channel_id(),
                        attempts,
                        loops,
                        "queue full, retrying"
                    );
                }
                Err(QueueError::Full(_)) => {
                    tracing::error!(
                        pid = %self.id,
                        channel = %self.queue.channel_id(),
                        message = %message,
                        attempts,
                        "queue full, giving up"
                    );
                    return Err(PeerError::QueueCommunication {
                        pid: self.id,
                        attempts,
                        message: Box::new(message),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl std::fmt::Debug for QueuePeer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePeer")
            .field("role", &self.role)
            .field("id", &self.id)
            .field("channel", &self.queue.channel_id())
            .field("retry", &self.retry)
            .finish()
    }
}

impl Communicator for QueuePeer {
    fn role(&self) -> PeerRole {
        self.role
    }

    fn id(&self) -> PeerId {
        self.id
    }

    fn send(
        &self,
        request: &str,
        recipient: Option<PeerId>,
        payload: Option<MessagePayload>,
    ) -> Result<Message, PeerError> {
        self.send_as(self.id, request, recipient, payload)
    }

    fn receive(&self) -> Result<Option<Message>, PeerError> {
        self.receive_any()
    }
}
