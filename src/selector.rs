/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Deterministic selection of the nodes that should store a record.
//!
//! ## Rendezvous hashing
//!
//! [`NodeSelector::select`] implements rendezvous (a.k.a. highest random weight) hashing. For every
//! candidate node, a [`NodeHasher`] computes a 64-bit weight over the pair `(key, node)`. Candidates are
//! ranked by descending weight, and the first [`ReplicationFactor`] of them are selected.
//!
//! Because the weight of a node depends only on the key and on the node itself, any process that knows
//! the same candidate list computes exactly the same selection without coordinating with anyone. Adding
//! or removing a single node only changes the selection of the keys for which that node ranks among the
//! top `N`, i.e., roughly `N/|nodes|` of all keys.
//!
//! ## Ties
//!
//! Two candidates can only receive the same weight on a hash collision. Such ties are broken by ranking
//! the candidate with the greater [`NodeAddress`] first, so that the result stays a total, deterministic
//! function of its inputs.

use std::sync::{Arc, Mutex};

use crate::types::{
    crypto_primitives::truncated_digest,
    data_types::{NodeAddress, RecordKey, ReplicationFactor},
};

/// Computes the rendezvous weight of a node for a key.
///
/// Implementations must be pure: the same `(key, node)` pair must always map to the same weight, in
/// every process.
pub trait NodeHasher: Send + Sync {
    fn hash(&self, key: RecordKey, node: &NodeAddress) -> u64;
}

/// Maximum number of scratch buffers that a [`Sha256Hasher`] keeps around for reuse.
pub const SCRATCH_POOL_SIZE: usize = 4096;

/// Default [`NodeHasher`]: SHA-256 over the canonical encoding of the key followed by the bytes of the
/// node address, truncated to the first 8 bytes of the digest read as a little-endian `u64`.
///
/// Hashing needs a buffer to concatenate the key and the node address in. Instead of allocating one on
/// every call, the hasher keeps a bounded pool of scratch buffers.
pub struct Sha256Hasher {
    pool: Mutex<Vec<Vec<u8>>>,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self {
            pool: Mutex::new(Vec::new()),
        }
    }

    fn take_buffer(&self) -> Vec<u8> {
        match self.pool.lock() {
            Ok(mut pool) => pool.pop().unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn return_buffer(&self, buf: Vec<u8>) {
        if let Ok(mut pool) = self.pool.lock() {
            if pool.len() < SCRATCH_POOL_SIZE {
                pool.push(buf);
            }
        }
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeHasher for Sha256Hasher {
    fn hash(&self, key: RecordKey, node: &NodeAddress) -> u64 {
        let mut buf = self.take_buffer();
        buf.clear();
        buf.reserve(RecordKey::ENCODED_LEN + node.len());
        buf.extend_from_slice(&key.to_le_bytes());
        buf.extend_from_slice(node.bytes());

        let weight = truncated_digest(&buf);
        self.return_buffer(buf);
        weight
    }
}

/// Maps a key to an ordered subset of at most [`ReplicationFactor`] candidate nodes.
///
/// `NodeSelector` is stateless apart from its configuration and is cheap to clone; clones share the
/// same hasher.
#[derive(Clone)]
pub struct NodeSelector {
    hasher: Arc<dyn NodeHasher>,
    replication_factor: ReplicationFactor,
}

impl NodeSelector {
    /// Create a `NodeSelector` that ranks nodes with `hasher` and selects up to `replication_factor` of
    /// them.
    pub fn new(hasher: Arc<dyn NodeHasher>, replication_factor: ReplicationFactor) -> Self {
        Self {
            hasher,
            replication_factor,
        }
    }

    /// Create a `NodeSelector` that uses the default [`Sha256Hasher`].
    pub fn with_default_hasher(replication_factor: ReplicationFactor) -> Self {
        Self::new(Arc::new(Sha256Hasher::new()), replication_factor)
    }

    pub fn replication_factor(&self) -> ReplicationFactor {
        self.replication_factor
    }

    /// Select the nodes that should store the record with `key` from `candidates`.
    ///
    /// Returns `min(N, candidates.len())` nodes, ordered from the highest rendezvous weight to the lowest.
    /// Read [Ties](self#ties) for how equal weights are ordered.
    pub fn select(&self, key: RecordKey, candidates: &[NodeAddress]) -> Vec<NodeAddress> {
        let mut weighted: Vec<(u64, &NodeAddress)> = candidates
            .iter()
            .map(|node| (self.hasher.hash(key, node), node))
            .collect();

        weighted.sort_by(|(weight_a, node_a), (weight_b, node_b)| {
            weight_b.cmp(weight_a).then_with(|| node_b.cmp(node_a))
        });

        weighted
            .into_iter()
            .take(self.replication_factor.int())
            .map(|(_, node)| node.clone())
            .collect()
    }
}
