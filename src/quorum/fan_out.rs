/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Running the same single-node operation on many nodes at once.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use crate::logging::first_seven_base64_chars;
use crate::node_client::{NodeClient, NodeError};
use crate::types::data_types::NodeAddress;

/// Spawn one thread per node in `nodes`, each running `job` against its node, and return the channel that
/// their results arrive on, in completion order.
///
/// The channel can buffer one result per node. A caller that stops reading early therefore never blocks
/// the remaining workers: they finish, push their result into the buffer, and exit. Their results are
/// dropped together with the receiver.
///
/// Once every worker has finished, the channel disconnects. A worker that panics sends nothing, so callers
/// must expect at most, not exactly, `nodes.len()` results.
pub(crate) fn fan_out<C, T, F>(
    client: &Arc<C>,
    nodes: &[NodeAddress],
    job: F,
) -> Receiver<Result<T, NodeError>>
where
    C: NodeClient,
    T: Send + 'static,
    F: Fn(&C, &NodeAddress) -> Result<T, NodeError> + Send + Sync + 'static,
{
    let (sender, receiver) = mpsc::sync_channel(nodes.len());
    let job = Arc::new(job);

    for node in nodes {
        let worker_sender = sender.clone();
        let client = Arc::clone(client);
        let job = Arc::clone(&job);
        let worker_node = node.clone();

        let spawned = thread::Builder::new()
            .name(format!("fan-out-{}", first_seven_base64_chars(node.bytes())))
            .spawn(move || {
                let result = job(&client, &worker_node);
                // Fails only if the caller already decided and dropped the receiver.
                let _ = worker_sender.send(result);
            });

        if let Err(err) = spawned {
            log::warn!("Failed to spawn a worker for node {}: {}", node, err);
            let _ = sender.try_send(Err(NodeError::Internal(format!(
                "failed to spawn worker: {}",
                err
            ))));
        }
    }

    receiver
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::types::data_types::RecordKey;

    /// Client whose calls succeed after `delay`, counting how many calls completed.
    struct SlowClient {
        delay: Duration,
        completed: AtomicUsize,
    }

    impl NodeClient for SlowClient {
        fn put(&self, _: &NodeAddress, _: RecordKey, _: &[u8]) -> Result<(), NodeError> {
            thread::sleep(self.delay);
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn del(&self, node: &NodeAddress, _: RecordKey) -> Result<(), NodeError> {
            if node.bytes() == b"panics" {
                panic!("simulated worker panic");
            }
            Ok(())
        }

        fn get(&self, _: &NodeAddress, _: RecordKey) -> Result<Vec<u8>, NodeError> {
            Err(NodeError::RecordNotFound)
        }
    }

    fn client(delay: Duration) -> Arc<SlowClient> {
        Arc::new(SlowClient {
            delay,
            completed: AtomicUsize::new(0),
        })
    }

    #[test]
    fn fan_out_runs_nodes_in_parallel_test() {
        let client = client(Duration::from_millis(200));
        let nodes: Vec<NodeAddress> = (0..5).map(|i| NodeAddress::from(format!("n{}", i))).collect();

        let started = std::time::Instant::now();
        let results = fan_out(&client, &nodes, |client, node| {
            client.put(node, RecordKey::new(1), b"v")
        });
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 5);
        // Five sequential calls would take a second.
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[test]
    fn workers_finish_after_receiver_is_dropped_test() {
        let client = client(Duration::from_millis(50));
        let nodes: Vec<NodeAddress> = (0..4).map(|i| NodeAddress::from(format!("n{}", i))).collect();

        let results = fan_out(&client, &nodes, |client, node| {
            client.put(node, RecordKey::new(1), b"v")
        });
        assert!(results.recv().unwrap().is_ok());
        drop(results);

        thread::sleep(Duration::from_millis(300));
        assert_eq!(client.completed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn panicking_worker_sends_nothing_test() {
        let client = client(Duration::ZERO);
        let nodes = vec![NodeAddress::from("ok"), NodeAddress::from("panics")];

        let results = fan_out(&client, &nodes, |client, node| client.del(node, RecordKey::new(1)));
        let collected: Vec<_> = results.iter().collect();
        assert_eq!(collected, vec![Ok(())]);
    }
}
