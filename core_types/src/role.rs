//! Role tags for peers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a session a peer plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeerRole {
    /// The process that created the session
    Parent,
    /// A worker process handed a peer by the parent
    Child,
}

impl PeerRole {
    pub fn is_parent(&self) -> bool {
        matches!(self, PeerRole::Parent)
    }

    pub fn is_child(&self) -> bool {
        matches!(self, PeerRole::Child)
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerRole::Parent => write!(f, "parent"),
            PeerRole::Child => write!(f, "child"),
        }
    }
}
