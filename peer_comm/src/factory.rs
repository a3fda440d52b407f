//! Session factories
//!
//! A factory is created once per session. It builds the transport up front
//! and hands out peers bound to it; the transport lives as long as any
//! factory or peer still refers to it.

use crate::config::{CommConfig, ConfigError, RetryPolicy};
use crate::peer::Communicator;
use crate::pipe::PipePeer;
use crate::queue::QueuePeer;
use core_types::PeerRole;
use ipc::ChannelId;
use std::sync::Arc;
use transport::{JoinableQueue, PipeEnd, SharedQueue};

/// Produces the peers of one session
pub trait CommunicationFactory {
    type Peer: Communicator;

    /// Returns a peer for the parent process
    fn parent(&self) -> Self::Peer;

    /// Returns a peer for a child process
    fn child(&self) -> Self::Peer;
}

/// Point-to-point session: one parent, one child
///
/// Calling `parent()` or `child()` again returns another handle on the same
/// fixed end of the pipe.
#[derive(Debug, Clone)]
pub struct PipeCommunication {
    parent_end: Arc<PipeEnd>,
    child_end: Arc<PipeEnd>,
}

impl PipeCommunication {
    pub fn new() -> Self {
        let (parent_end, child_end) = PipeEnd::pair();
        tracing::debug!(channel = %parent_end.channel_id(), "pipe session created");
        Self {
            parent_end: Arc::new(parent_end),
            child_end: Arc::new(child_end),
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        self.parent_end.channel_id()
    }
}

impl Default for PipeCommunication {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunicationFactory for PipeCommunication {
    type Peer = PipePeer;

    fn parent(&self) -> PipePeer {
        PipePeer::new(PeerRole::Parent, Arc::clone(&self.parent_end))
    }

    fn child(&self) -> PipePeer {
        PipePeer::new(PeerRole::Child, Arc::clone(&self.child_end))
    }
}

/// Shared-queue session: one parent, any number of children
///
/// Every peer from the same factory shares one queue. Retry configuration
/// belongs to the peer, so `parent_with` and `child_with` let individual
/// peers tolerate backpressure differently.
#[derive(Clone)]
pub struct QueueCommunication {
    queue: Arc<dyn JoinableQueue>,
    retry: RetryPolicy,
}

impl QueueCommunication {
    /// Creates a session over a queue bounded to `capacity` (0 = unbounded)
    pub fn new(capacity: usize) -> Self {
        Self::with_queue(Arc::new(SharedQueue::with_capacity(capacity)))
    }

    /// Creates a session from a validated configuration
    pub fn from_config(config: &CommConfig) -> Result<Self, ConfigError> {
        let retry = config.retry_policy()?;
        let session = Self::new(config.capacity);
        Ok(Self { retry, ..session })
    }

    /// Creates a session over any joinable queue
    pub fn with_queue(queue: Arc<dyn JoinableQueue>) -> Self {
        tracing::debug!(channel = %queue.channel_id(), "queue session created");
        Self {
            queue,
            retry: RetryPolicy::default(),
        }
    }

    /// Returns a parent peer with its own retry policy
    pub fn parent_with(&self, retry: RetryPolicy) -> QueuePeer {
        QueuePeer::new(PeerRole::Parent, Arc::clone(&self.queue), retry)
    }

    /// Returns a child peer with its own retry policy
    pub fn child_with(&self, retry: RetryPolicy) -> QueuePeer {
        QueuePeer::new(PeerRole::Child, Arc::clone(&self.queue), retry)
    }

    pub fn channel_id(&self) -> ChannelId {
        self.queue.channel_id()
    }
}

impl Default for QueueCommunication {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for QueueCommunication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueCommunication")
            .field("channel", &self.queue.channel_id())
            .field("retry", &self.retry)
            .finish()
    }
}

impl CommunicationFactory for QueueCommunication {
    type Peer = QueuePeer;

    fn parent(&self) -> QueuePeer {
        self.parent_with(self.retry)
    }

    fn child(&self) -> QueuePeer {
        self.child_with(self.retry)
    }
}
