//! Unique identifiers for communicating peers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a communicating process
///
/// On the wire this is a plain integer. By default it is the operating
/// system's process id, but peers living in the same process (threads
/// standing in for workers) may be given distinct ids explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(u32);

impl PeerId {
    /// Returns the id of the current OS process
    pub fn current() -> Self {
        Self(std::process::id())
    }

    /// Creates a peer ID from a raw integer
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer
    pub const fn as_raw(&self) -> u32 {
        self.0
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::current()
    }
}

impl From<u32> for PeerId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_current_matches_process() {
        assert_eq!(PeerId::current().as_raw(), std::process::id());
        assert_eq!(PeerId::default(), PeerId::current());
    }

    #[test]
    fn test_peer_id_from_raw() {
        let id = PeerId::from_raw(4242);
        assert_eq!(id.as_raw(), 4242);
        assert_eq!(PeerId::from(4242), id);
    }

    #[test]
    fn test_peer_id_display() {
        let id = PeerId::from_raw(17);
        assert_eq!(format!("{}", id), "17");
    }

    #[test]
    fn test_peer_id_serializes_as_integer() {
        let id = PeerId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "99");

        let back: PeerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
