//! Point-to-point peer

use crate::error::PeerError;
use crate::peer::Communicator;
use core_types::{PeerId, PeerRole};
use ipc::{Message, MessagePayload};
use std::sync::Arc;
use transport::{PipeEnd, PipeError};

/// Peer bound to one fixed end of a private pipe
///
/// Several handles may share the same end; they all see one FIFO stream.
#[derive(Debug, Clone)]
pub struct PipePeer {
    role: PeerRole,
    id: PeerId,
    end: Arc<PipeEnd>,
}

impl PipePeer {
    pub fn new(role: PeerRole, end: Arc<PipeEnd>) -> Self {
        Self {
            role,
            id: PeerId::current(),
            end,
        }
    }

    /// Overrides the id stamped on outgoing messages
    pub fn with_id(mut self, id: PeerId) -> Self {
        self.id = id;
        self
    }

    /// Checks whether a message is waiting, without taking it
    pub fn poll(&self) -> bool {
        self.end.poll()
    }
}

impl Communicator for PipePeer {
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
        let message = Message::encode(request, self.id, recipient, payload)?;

        self.end.send(message.clone()).map_err(|err| match err {
            PipeError::Disconnected(message) => PeerError::Disconnected {
                pid: self.id,
                message: Box::new(message),
            },
        })?;

        tracing::debug!(
            pid = %self.id,
            role = %self.role,
            channel = %self.end.channel_id(),
            request = message.request(),
            "pipe message sent"
        );
        Ok(message)
    }

    fn receive(&self) -> Result<Option<Message>, PeerError> {
        Ok(self.end.try_recv())
    }
}
