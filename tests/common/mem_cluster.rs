//! A volatile, in-memory cluster of storage nodes, reachable through [`NodeClient`].

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use quorum_kv::{
    node_client::{NodeClient, NodeError},
    types::data_types::{NodeAddress, RecordKey},
};

#[derive(Default)]
struct MemNode {
    records: HashMap<RecordKey, Vec<u8>>,
    // Every call fails with this error, if set.
    fault: Option<NodeError>,
    delay: Duration,
}

/// A set of in-memory storage nodes. Clones share the same nodes.
///
/// Faults and delays can be injected per node to simulate crashed, slow, or misbehaving nodes.
#[derive(Clone)]
pub(crate) struct MemCluster {
    nodes: Arc<Mutex<HashMap<NodeAddress, MemNode>>>,
    calls: Arc<AtomicUsize>,
}

impl MemCluster {
    pub(crate) fn new(addresses: &[NodeAddress]) -> MemCluster {
        let nodes = addresses
            .iter()
            .map(|address| (address.clone(), MemNode::default()))
            .collect();
        MemCluster {
            nodes: Arc::new(Mutex::new(nodes)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every subsequent call to `node` fail with `err`.
    pub(crate) fn fail(&self, node: &NodeAddress, err: NodeError) {
        self.with_node(node, |mem_node| mem_node.fault = Some(err));
    }

    pub(crate) fn heal(&self, node: &NodeAddress) {
        self.with_node(node, |mem_node| mem_node.fault = None);
    }

    /// Make every subsequent call to `node` take at least `delay`.
    pub(crate) fn delay(&self, node: &NodeAddress, delay: Duration) {
        self.with_node(node, |mem_node| mem_node.delay = delay);
    }

    /// Store `value` directly on `node`, bypassing any coordinator.
    pub(crate) fn insert(&self, node: &NodeAddress, key: RecordKey, value: &[u8]) {
        self.with_node(node, |mem_node| {
            mem_node.records.insert(key, value.to_vec());
        });
    }

    pub(crate) fn value(&self, node: &NodeAddress, key: RecordKey) -> Option<Vec<u8>> {
        self.with_node(node, |mem_node| mem_node.records.get(&key).cloned())
    }

    /// Number of nodes that currently store `key`.
    pub(crate) fn replicas_of(&self, key: RecordKey) -> usize {
        self.nodes
            .lock()
            .unwrap()
            .values()
            .filter(|mem_node| mem_node.records.contains_key(&key))
            .count()
    }

    /// Number of calls made through [`NodeClient`] so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with_node<T>(&self, node: &NodeAddress, f: impl FnOnce(&mut MemNode) -> T) -> T {
        let mut nodes = self.nodes.lock().unwrap();
        f(nodes.get_mut(node).expect("node is not part of the cluster"))
    }

    // Simulate a call to `node`: wait for its delay, then run `f` unless the node is faulty.
    fn call<T>(
        &self,
        node: &NodeAddress,
        f: impl FnOnce(&mut MemNode) -> Result<T, NodeError>,
    ) -> Result<T, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = match self.nodes.lock().unwrap().get(node) {
            Some(mem_node) => mem_node.delay,
            None => return Err(NodeError::Unavailable),
        };
        thread::sleep(delay);

        let mut nodes = self.nodes.lock().unwrap();
        let mem_node = nodes.get_mut(node).ok_or(NodeError::Unavailable)?;
        if let Some(err) = &mem_node.fault {
            return Err(err.clone());
        }
        f(mem_node)
    }
}

impl NodeClient for MemCluster {
    fn put(&self, node: &NodeAddress, key: RecordKey, value: &[u8]) -> Result<(), NodeError> {
        self.call(node, |mem_node| {
            if mem_node.records.contains_key(&key) {
                return Err(NodeError::RecordExists);
            }
            mem_node.records.insert(key, value.to_vec());
            Ok(())
        })
    }

    fn del(&self, node: &NodeAddress, key: RecordKey) -> Result<(), NodeError> {
        self.call(node, |mem_node| {
            mem_node
                .records
                .remove(&key)
                .map(|_| ())
                .ok_or(NodeError::RecordNotFound)
        })
    }

    fn get(&self, node: &NodeAddress, key: RecordKey) -> Result<Vec<u8>, NodeError> {
        self.call(node, |mem_node| {
            mem_node
                .records
                .get(&key)
                .cloned()
                .ok_or(NodeError::RecordNotFound)
        })
    }
}
