//! # Inter-Process Communication (IPC)
//!
//! This crate defines the unit exchanged between a parent process and its
//! children.
//!
//! ## Philosophy
//!
//! - **Messages, not shared memory**: All communication is explicit message passing
//! - **Addressed**: Every message names its sender and, optionally, a single recipient
//! - **Immutable**: A peer that does not consume a message re-publishes an identical copy
//!
//! ## Wire Shape
//!
//! A message is an ordered tuple of exactly four fields:
//!
//! ```text
//! [request: string, sender_id: integer, recipient_id: integer | null, payload: any | null]
//! ```
//!
//! A `null` recipient means the message is a broadcast that any consumer may take.

pub mod channel;
pub mod error;
pub mod message;
pub mod protocol;

pub use channel::ChannelId;
pub use error::{MessageError, WireError};
pub use message::{Message, MessagePayload};
pub use protocol::{REQ_DIE, REQ_DO, REQ_FINISHED, REQ_TEST_CHILD, REQ_TEST_PARENT};
