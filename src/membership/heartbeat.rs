/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Background thread that keeps a storage node live in the eyes of the membership service.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::logging::first_seven_base64_chars;
use crate::types::data_types::NodeAddress;

use super::{MembershipClient, MembershipError};

/// A handle to a thread that sends a heartbeat for `node` every `interval`. When this value is dropped,
/// the thread is gracefully shut down.
///
/// The interval should be comfortably shorter than the router's `forget_timeout`, so that a single lost
/// heartbeat does not make the node look dead.
pub struct HeartbeatSender {
    thread: Option<JoinHandle<()>>,
    shutdown: Sender<()>,
}

impl HeartbeatSender {
    /// Start sending heartbeats for `node` to `membership`. The first heartbeat is sent immediately.
    pub fn start<M: MembershipClient + 'static>(
        node: NodeAddress,
        membership: M,
        interval: Duration,
    ) -> HeartbeatSender {
        let (shutdown, shutdown_receiver) = mpsc::channel();
        let thread = thread::spawn(move || loop {
            match membership.heartbeat(&node) {
                Ok(()) => (),
                Err(MembershipError::UnknownNode) => {
                    log::error!(
                        "Node {} is not part of the cluster, stopping heartbeats",
                        first_seven_base64_chars(node.bytes())
                    );
                    return;
                }
                Err(err) => log::warn!(
                    "Heartbeat from {} failed: {}",
                    first_seven_base64_chars(node.bytes()),
                    err
                ),
            }

            match shutdown_receiver.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => (),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            }
        });

        HeartbeatSender {
            thread: Some(thread),
            shutdown,
        }
    }
}

impl Drop for HeartbeatSender {
    fn drop(&mut self) {
        // The thread may already have exited, in which case the send fails harmlessly.
        let _ = self.shutdown.send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Heartbeat thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::types::data_types::RecordKey;

    #[derive(Default)]
    struct CountingMembership {
        heartbeats: AtomicUsize,
        reject: bool,
    }

    impl MembershipClient for CountingMembership {
        fn heartbeat(&self, _: &NodeAddress) -> Result<(), MembershipError> {
            self.heartbeats.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                Err(MembershipError::UnknownNode)
            } else {
                Ok(())
            }
        }

        fn find_live_replicas(&self, _: RecordKey) -> Result<Vec<NodeAddress>, MembershipError> {
            Ok(Vec::new())
        }

        fn list_all(&self) -> Result<Vec<NodeAddress>, MembershipError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn heartbeat_sender_beats_until_dropped_test() {
        let membership = Arc::new(CountingMembership::default());
        let sender = HeartbeatSender::start(
            NodeAddress::from("a"),
            Arc::clone(&membership),
            Duration::from_millis(10),
        );
        while membership.heartbeats.load(Ordering::SeqCst) < 3 {
            thread::sleep(Duration::from_millis(5));
        }
        drop(sender);

        let after_drop = membership.heartbeats.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(membership.heartbeats.load(Ordering::SeqCst), after_drop);
    }

    #[test]
    fn heartbeat_sender_stops_when_node_is_unknown_test() {
        let membership = Arc::new(CountingMembership {
            heartbeats: AtomicUsize::new(0),
            reject: true,
        });
        let sender = HeartbeatSender::start(
            NodeAddress::from("z"),
            Arc::clone(&membership),
            Duration::from_millis(5),
        );
        thread::sleep(Duration::from_millis(50));
        assert_eq!(membership.heartbeats.load(Ordering::SeqCst), 1);
        drop(sender);
    }
}
