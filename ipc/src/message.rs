//! Message type and its wire representation

use crate::error::{MessageError, WireError};
use core_types::PeerId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque payload carried by a message
///
/// Any serializable value can travel as a payload. The receiver decides
/// which concrete type to read it back as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessagePayload(Value);

impl MessagePayload {
    /// Creates a new payload from serializable data
    pub fn new<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::to_value(data)?))
    }

    /// Wraps an already-built JSON value
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Deserializes the payload into a specific type
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }

    /// Returns the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for MessagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The unit exchanged between peers
///
/// Once built a message is never modified. A peer that declines a message
/// taken from a shared queue re-publishes a clone of it, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireMessage", try_from = "WireMessage")]
pub struct Message {
    request: String,
    sender: PeerId,
    recipient: Option<PeerId>,
    payload: Option<MessagePayload>,
}

/// Positional form used on the wire: exactly four fields, order significant.
#[derive(Serialize, Deserialize)]
struct WireMessage(
    String,
    PeerId,
    Option<PeerId>,
    Option<MessagePayload>,
);

impl Message {
    /// Builds a message
    ///
    /// A missing recipient makes the message a broadcast. A payload holding
    /// JSON `null` is treated as no payload at all, since the two are
    /// indistinguishable on the wire.
    pub fn encode(
        request: impl Into<String>,
        sender: PeerId,
        recipient: Option<PeerId>,
        payload: Option<MessagePayload>,
    ) -> Result<Self, MessageError> {
        let request = request.into();
        if request.is_empty() {
            return Err(MessageError::EmptyRequest);
        }

        let payload = payload.filter(|p| !p.as_value().is_null());

        Ok(Self {
            request,
            sender,
            recipient,
            payload,
        })
    }

    /// Returns the request tag
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Returns the id of the peer that sent this message
    pub fn sender(&self) -> PeerId {
        self.sender
    }

    /// Returns the intended recipient, if any
    pub fn recipient(&self) -> Option<PeerId> {
        self.recipient
    }

    /// Returns the payload, if any
    pub fn payload(&self) -> Option<&MessagePayload> {
        self.payload.as_ref()
    }

    /// Checks whether any consumer may take this message
    pub fn is_broadcast(&self) -> bool {
        self.recipient.is_none()
    }

    /// Checks whether `peer` may take this message
    ///
    /// True for broadcasts and for messages naming `peer` as recipient.
    pub fn is_addressed_to(&self, peer: PeerId) -> bool {
        match self.recipient {
            None => true,
            Some(recipient) => recipient == peer,
        }
    }

    /// Checks the request tag
    pub fn is_request(&self, request: &str) -> bool {
        self.request == request
    }

    /// Encodes this message as its 4-element JSON array
    pub fn to_wire(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Encode)
    }

    /// Decodes a message from its 4-element JSON array
    pub fn from_wire(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(WireError::Decode)
    }
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        WireMessage(
            message.request,
            message.sender,
            message.recipient,
            message.payload,
        )
    }
}

impl TryFrom<WireMessage> for Message {
    type Error = MessageError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let WireMessage(request, sender, recipient, payload) = wire;
        Message::encode(request, sender, recipient, payload)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {}, ", self.request, self.sender)?;
        match self.recipient {
            Some(recipient) => write!(f, "{}, ", recipient)?,
            None => write!(f, "None, ")?,
        }
        match &self.payload {
            Some(payload) => write!(f, "{}]", payload),
            None => write!(f, "None]"),
        }
    }
}
