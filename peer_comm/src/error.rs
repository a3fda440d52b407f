//! Error taxonomy for peers

use core_types::PeerId;
use ipc::{Message, MessageError};
use thiserror::Error;
use transport::QueueError;

/// Errors surfaced by `send` and `receive`
///
/// "No message available" is not an error: it is `Ok(None)`.
#[derive(Debug, Error)]
pub enum PeerError {
    /// The shared queue stayed full for the whole retry budget
    #[error("Process {pid} tried unsuccessfully to put the following {message} in the queue")]
    QueueCommunication {
        pid: PeerId,
        attempts: u32,
        message: Box<Message>,
    },

    /// Every handle to the other end of a pipe has been dropped
    #[error("Process {pid} could not send {message}: counterpart disconnected")]
    Disconnected { pid: PeerId, message: Box<Message> },

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] MessageError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

impl PeerError {
    /// Returns the message that could not be delivered, if any
    pub fn undelivered(&self) -> Option<&Message> {
        match self {
            PeerError::QueueCommunication { message, .. }
            | PeerError::Disconnected { message, .. } => Some(message.as_ref()),
            PeerError::InvalidMessage(_) | PeerError::Queue(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_communication_display() {
        let pid = PeerId::from_raw(321);
        let message = Message::encode("DO", pid, None, None).unwrap();
        let error = PeerError::QueueCommunication {
            pid,
            attempts: 10,
            message: Box::new(message.clone()),
        };

        let text = error.to_string();
        assert!(text.contains("Process 321"));
        assert!(text.contains(r#"["DO", 321, None, None]"#));
        assert_eq!(error.undelivered(), Some(&message));
    }

    #[test]
    fn test_invalid_message_has_nothing_undelivered() {
        let error = PeerError::from(MessageError::EmptyRequest);
        assert!(error.undelivered().is_none());
    }
}
