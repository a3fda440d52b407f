//! Private two-party channel

use crossbeam_channel::{Receiver, Sender};
use ipc::{ChannelId, Message};
use thiserror::Error;

/// Pipe error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipeError {
    /// Every handle to the opposite end is gone. The message is handed back.
    #[error("Counterpart disconnected, could not deliver {0}")]
    Disconnected(Message),
}

/// One end of a bidirectional pipe
///
/// What one end sends, the other end receives, in send order. Unlike a
/// shared queue there is no addressing: everything written to a pipe is
/// for the sole counterpart.
#[derive(Debug)]
pub struct PipeEnd {
    channel: ChannelId,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
}

impl PipeEnd {
    /// Creates a pair of ends connected to each other.
    pub fn pair() -> (Self, Self) {
        let channel = ChannelId::new();
        let (tx_a, rx_a) = crossbeam_channel::unbounded();
        let (tx_b, rx_b) = crossbeam_channel::unbounded();

        let a = Self {
            channel,
            sender: tx_a,
            receiver: rx_b,
        };
        let b = Self {
            channel,
            sender: tx_b,
            receiver: rx_a,
        };

        (a, b)
    }

    /// Writes a message for the counterpart.
    pub fn send(&self, message: Message) -> Result<(), PipeError> {
        self.sender
            .send(message)
            .map_err(|err| PipeError::Disconnected(err.into_inner()))
    }

    /// Takes the next message if one is waiting. Never blocks.
    pub fn try_recv(&self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }

    /// Checks whether a message is waiting.
    pub fn poll(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Returns the identity shared by both ends.
    pub fn channel_id(&self) -> ChannelId {
        self.channel
    }
}
