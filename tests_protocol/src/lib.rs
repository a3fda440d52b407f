//! Protocol Test Utilities
//!
//! Shared helpers for the integration tests in `tests/`.
//!
//! ## Test Philosophy
//!
//! - **Threads as processes**: Each worker thread gets its own `PeerId`, standing
//!   in for a separate OS process
//! - **Nothing lost**: Every enqueued message is accepted exactly once, checked
//!   with the drain barrier
//! - **Bounded waits**: Polling loops give up after a deadline instead of hanging

use core_types::PeerId;
use ipc::{Message, REQ_DIE, REQ_FINISHED};
use peer_comm::{Communicator, PeerError, QueuePeer};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Id given to the parent in tests
pub const PARENT_ID: PeerId = PeerId::from_raw(1);

/// Polling interval used by test workers
pub const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Longest any test loop waits before failing
pub const DEADLINE: Duration = Duration::from_secs(10);

/// Installs a fmt subscriber honoring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Id of the n-th child (1-based), distinct from [`PARENT_ID`]
pub fn child_id(n: u32) -> PeerId {
    PeerId::from_raw(100 + n)
}

/// Polls `receive` until it yields a message or [`DEADLINE`] passes
pub fn receive_within<F>(mut receive: F) -> Option<Message>
where
    F: FnMut() -> Result<Option<Message>, PeerError>,
{
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        match receive() {
            Ok(Some(message)) => return Some(message),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => {
                tracing::error!(error = %err, "receive failed");
                return None;
            }
        }
    }
    None
}

/// Worker loop used by the fan-out scenarios
///
/// Takes messages addressed to this child (or broadcast). Replies to every
/// non-DIE request with `FINISHED` carrying `identifier`, and stops on `DIE`.
/// Returns how many requests were answered.
pub fn run_child(peer: QueuePeer, parent: PeerId, identifier: u32) -> Result<usize, PeerError> {
    let mut answered = 0;
    let start = Instant::now();

    while start.elapsed() < DEADLINE {
        let Some(message) = peer.receive_if(|m| m.is_addressed_to(peer.id()))? else {
            thread::sleep(POLL_INTERVAL);
            continue;
        };

        if message.is_request(REQ_DIE) {
            tracing::debug!(pid = %peer.id(), answered, "child terminating");
            return Ok(answered);
        }

        let payload = ipc::MessagePayload::new(&identifier).ok();
        peer.send(REQ_FINISHED, Some(parent), payload)?;
        answered += 1;
    }

    Ok(answered)
}
