//! # Transports
//!
//! The two channels peers talk over:
//!
//! - [`PipeEnd`]: one end of a private, cross-wired, two-party channel
//! - [`SharedQueue`]: a bounded (or unbounded) FIFO shared by every peer of a
//!   session, with outstanding-work accounting for a drain barrier
//!
//! Neither transport interprets messages. Mutual exclusion on enqueue and
//! dequeue is provided here; the protocol built on top adds none of its own.

pub mod fault_injection;
pub mod pipe;
pub mod queue;

pub use pipe::{PipeEnd, PipeError};
pub use queue::{JoinableQueue, QueueError, SharedQueue};
