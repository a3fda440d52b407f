//! # Core Types
//!
//! This crate defines the identity types shared by every peer of the
//! messaging layer.
//!
//! ## Key Types
//!
//! - [`PeerId`]: Integer identifier of a communicating process
//! - [`PeerRole`]: Whether a peer acts as the parent or as a child

pub mod ids;
pub mod role;

pub use ids::PeerId;
pub use role::PeerRole;
