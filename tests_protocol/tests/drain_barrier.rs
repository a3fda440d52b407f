//! Drain Barrier Tests
//!
//! `queue_join` must hold the parent until every enqueued message has been
//! accepted by some consumer, and no longer.

use ipc::{MessagePayload, REQ_DIE, REQ_DO, REQ_FINISHED};
use peer_comm::{CommunicationFactory, Communicator, QueueCommunication};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tests_protocol::{child_id, init_test_logging, receive_within, PARENT_ID};

/// Test: Join waits for a slow consumer to accept every message
#[test]
fn test_join_waits_for_slow_consumer() {
    init_test_logging();
    let session = QueueCommunication::new(0);
    let parent = session.parent().with_id(PARENT_ID);
    let child = session.child().with_id(child_id(1));
    let accepted = Arc::new(AtomicUsize::new(0));

    for n in 0..5u32 {
        parent
            .send(REQ_DO, None, Some(MessagePayload::new(&n).expect("payload")))
            .expect("send");
    }

    let worker = {
        let accepted = Arc::clone(&accepted);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            while receive_within(|| child.receive()).is_some() {
                accepted.fetch_add(1, Ordering::SeqCst);
                if accepted.load(Ordering::SeqCst) == 5 {
                    break;
                }
            }
        })
    };

    parent.queue_join();
    assert_eq!(accepted.load(Ordering::SeqCst), 5);
    worker.join().expect("worker panicked");
}

/// Test: Five children each report once, the parent sums each exactly once
///
/// Reports are addressed to the parent, so children bounce each other's
/// reports around the queue while the DO broadcasts are in flight.
#[test]
fn test_join_after_every_child_reports() {
    init_test_logging();
    const CHILDREN: u32 = 5;

    let session = QueueCommunication::new(0);
    let parent = session.parent().with_id(PARENT_ID);

    let workers: Vec<_> = (1..=CHILDREN)
        .map(|n| {
            let child = session.child().with_id(child_id(n));
            thread::spawn(move || {
                let order = receive_within(|| {
                    child.receive_if(|m| m.is_addressed_to(child.id()) && m.is_request(REQ_DO))
                })
                .expect("DO within deadline");
                assert!(order.is_broadcast());

                let payload = MessagePayload::new(&n).expect("payload");
                child
                    .send(REQ_FINISHED, Some(PARENT_ID), Some(payload))
                    .expect("report");

                let die = receive_within(|| {
                    child.receive_if(|m| m.is_addressed_to(child.id()) && m.is_request(REQ_DIE))
                })
                .expect("DIE within deadline");
                assert!(die.is_broadcast());
            })
        })
        .collect();

    for _ in 0..CHILDREN {
        parent.send(REQ_DO, None, None).expect("send DO");
    }

    let mut reported = Vec::new();
    while reported.len() < CHILDREN as usize {
        let report = receive_within(|| parent.receive_if(|m| m.recipient() == Some(PARENT_ID)))
            .expect("report within deadline");
        let n: u32 = report.payload().expect("payload").deserialize().expect("u32");
        reported.push(n);
    }

    for _ in 0..CHILDREN {
        parent.send(REQ_DIE, None, None).expect("send DIE");
    }
    for worker in workers {
        worker.join().expect("child thread panicked");
    }

    parent.queue_join();
    reported.sort_unstable();
    assert_eq!(reported, (1..=CHILDREN).collect::<Vec<_>>());
    assert_eq!(reported.iter().sum::<u32>(), 15);
    assert_eq!(parent.outstanding(), 0);
}
