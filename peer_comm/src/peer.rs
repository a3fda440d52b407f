//! Transport-agnostic peer interface

use crate::error::PeerError;
use core_types::{PeerId, PeerRole};
use ipc::{Message, MessagePayload};

/// One endpoint of a session
///
/// Implemented by [`crate::PipePeer`] and [`crate::QueuePeer`]. The trait
/// is object-safe, so application loops can hold a `Box<dyn Communicator>`
/// without caring which transport sits underneath.
pub trait Communicator: Send + Sync {
    /// Whether this is the parent's or a child's endpoint
    fn role(&self) -> PeerRole;

    /// The id stamped as sender on every message this peer sends
    fn id(&self) -> PeerId;

    /// Sends a request, returning the message as it was put on the transport
    ///
    /// A `None` recipient makes the message a broadcast.
    fn send(
        &self,
        request: &str,
        recipient: Option<PeerId>,
        payload: Option<MessagePayload>,
    ) -> Result<Message, PeerError>;

    /// Takes the next message available to this peer without blocking
    ///
    /// Returns `Ok(None)` when nothing is waiting.
    fn receive(&self) -> Result<Option<Message>, PeerError>;
}
