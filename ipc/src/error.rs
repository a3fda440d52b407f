//! Errors raised while building or decoding messages

use thiserror::Error;

/// A message could not be constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("Request tag must not be empty")]
    EmptyRequest,
}

/// A message could not be converted to or from its wire form
#[derive(Debug, Error)]
pub enum WireError {
    #[error("Encoding error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Decoding error: {0}")]
    Decode(#[source] serde_json::Error),
}
