//! # Peer Communication
//!
//! Parent/child messaging over two interchangeable transports.
//!
//! ## Architecture
//!
//! A factory is created once per session. It owns the transport and hands
//! out peers bound to it:
//!
//! - [`PipeCommunication`]: one parent, one child, over a private pipe
//! - [`QueueCommunication`]: one parent, many children, over a shared queue
//!
//! Both kinds of peer implement [`Communicator`]; callers build their own
//! request loop on top of `send` and `receive`. `receive` never blocks.
//!
//! ## Selective Consumption
//!
//! On the shared queue a consumer passes a predicate to
//! [`QueuePeer::receive_if`]. A message the predicate rejects goes back to
//! the tail of the queue, untouched, so it can reach the peer it was meant
//! for. The parent can then wait on [`QueuePeer::queue_join`] until every
//! message ever enqueued has been taken and accounted for.
//!
//! ## Example
//!
//! ```
//! use core_types::PeerId;
//! use peer_comm::{CommunicationFactory, Communicator, QueueCommunication};
//!
//! let session = QueueCommunication::new(0);
//! let parent = session.parent().with_id(PeerId::from_raw(1));
//! let child = session.child().with_id(PeerId::from_raw(2));
//!
//! parent.send(ipc::REQ_DO, Some(child.id()), None)?;
//! let message = child.receive_if(|m| m.is_addressed_to(child.id()))?;
//! assert_eq!(message.map(|m| m.sender()), Some(parent.id()));
//!
//! parent.queue_join();
//! # Ok::<(), peer_comm::PeerError>(())
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod peer;
pub mod pipe;
pub mod queue;

pub use config::{CommConfig, ConfigError, RetryPolicy};
pub use error::PeerError;
pub use factory::{CommunicationFactory, PipeCommunication, QueueCommunication};
pub use peer::Communicator;
pub use pipe::PipePeer;
pub use queue::QueuePeer;
