//! Full-Duplex Fan-Out Tests
//!
//! The parent addresses one specific child among many; only that child
//! answers. The parent then broadcasts DIE and waits for the queue to drain.

use core_types::PeerId;
use ipc::{REQ_DIE, REQ_DO, REQ_FINISHED};
use peer_comm::{CommunicationFactory, Communicator, QueueCommunication};
use std::thread;
use tests_protocol::{child_id, init_test_logging, receive_within, run_child, PARENT_ID};

fn parent_full_duplex_communication_with_children(target: u32, children: u32) {
    let session = QueueCommunication::new(0);
    let parent = session.parent().with_id(PARENT_ID);

    let workers: Vec<_> = (1..=children)
        .map(|n| {
            let child = session.child().with_id(child_id(n));
            thread::spawn(move || run_child(child, PARENT_ID, n))
        })
        .collect();

    parent
        .send(REQ_DO, Some(child_id(target)), None)
        .expect("parent send");

    // Broadcasts are for children, so the parent only takes what names it.
    let reply = receive_within(|| parent.receive_if(|m| m.recipient() == Some(PARENT_ID)))
        .expect("reply within deadline");

    assert_eq!(reply.request(), REQ_FINISHED);
    assert_eq!(reply.sender(), child_id(target));
    let identifier: u32 = reply.payload().expect("payload").deserialize().expect("u32");
    assert_eq!(identifier, target);
    assert!(parent.queue_empty());

    for _ in 0..children {
        parent.send(REQ_DIE, None, None).expect("parent send DIE");
    }

    let answered: Vec<usize> = workers
        .into_iter()
        .map(|worker| {
            worker
                .join()
                .expect("child thread panicked")
                .expect("child loop failed")
        })
        .collect();

    // Every child fetched its DIE, so nothing is outstanding.
    parent.queue_join();
    assert_eq!(answered.iter().sum::<usize>(), 1);
    assert_eq!(answered[(target - 1) as usize], 1);
}

/// Test: A targeted request is answered by its recipient only
#[test]
fn test_parent_full_duplex_communication_with_children() {
    init_test_logging();
    parent_full_duplex_communication_with_children(3, 5);
}

/// Test: Repeated sessions of varying size all terminate cleanly
///
/// Guards against the polling delays masking a lost or duplicated message.
#[test]
fn test_parent_full_duplex_communication_with_children_stress_test() {
    init_test_logging();
    for (target, children) in [(1, 1), (1, 4), (2, 5), (5, 5), (3, 10), (7, 8)] {
        parent_full_duplex_communication_with_children(target, children);
    }
}

/// Test: A request for a peer nobody plays keeps circulating
///
/// Nobody accepts it, so it stays outstanding; the parent reclaims it
/// itself, after which the drain barrier returns.
#[test]
fn test_unclaimed_message_circulates_until_reclaimed() {
    init_test_logging();
    let session = QueueCommunication::new(0);
    let parent = session.parent().with_id(PARENT_ID);
    let children: Vec<_> = (1..=3).map(|n| session.child().with_id(child_id(n))).collect();

    let stranger = PeerId::from_raw(9999);
    let sent = parent.send(REQ_DO, Some(stranger), None).expect("send");

    for _ in 0..10 {
        for child in &children {
            let taken = child
                .receive_if(|m| m.is_addressed_to(child.id()))
                .expect("receive");
            assert!(taken.is_none());
        }
    }
    assert_eq!(parent.queue_len(), 1);
    assert_eq!(parent.outstanding(), 1);

    let reclaimed = parent.receive().expect("receive").expect("still queued");
    assert_eq!(reclaimed, sent);
    parent.queue_join();
}
