/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The interface between the coordinator and the storage nodes.
//!
//! The crate does not store records itself, nor does it implement any wire protocol for talking to storage
//! nodes. Instead, library users provide an implementation of [`NodeClient`] that reaches a given node
//! and performs a single-node Put, Del, or Get on it.
//!
//! ## Comparable errors
//!
//! The coordinator counts how many nodes failed *with the same error* in order to surface a reproducible
//! failure (for example, "record already exists") instead of a generic quorum failure. That is why
//! [`NodeError`] is a plain, comparable enum: implementations must map their transport- or engine-specific
//! failures onto it, so that equal failures on different nodes compare equal.

use std::fmt::{self, Display, Formatter};

use crate::types::data_types::{NodeAddress, RecordKey};

/// Performs operations on a single storage node.
///
/// Calls are made concurrently from one thread per node. Any timeout is the implementation's concern; the
/// coordinator waits for every call it makes to return.
pub trait NodeClient: Send + Sync + 'static {
    /// Store `value` under `key` on `node`, failing if `key` already exists there.
    fn put(&self, node: &NodeAddress, key: RecordKey, value: &[u8]) -> Result<(), NodeError>;

    /// Delete `key` from `node`, failing if it does not exist there.
    fn del(&self, node: &NodeAddress, key: RecordKey) -> Result<(), NodeError>;

    /// Read the value stored under `key` on `node`.
    fn get(&self, node: &NodeAddress, key: RecordKey) -> Result<Vec<u8>, NodeError>;
}

/// Enumerates the ways a single-node operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeError {
    /// A Put found a record already stored under the key.
    RecordExists,

    /// A Del or Get found no record under the key.
    RecordNotFound,

    /// The node could not be reached.
    Unavailable,

    /// The node did not answer in time.
    Timeout,

    /// Any other failure. Two `Internal` errors only count as the same error if their descriptions are
    /// equal.
    Internal(String),
}

impl Display for NodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::RecordExists => write!(f, "record exists"),
            NodeError::RecordNotFound => write!(f, "record not found"),
            NodeError::Unavailable => write!(f, "node unavailable"),
            NodeError::Timeout => write!(f, "node timed out"),
            NodeError::Internal(reason) => write!(f, "internal node error: {}", reason),
        }
    }
}

impl std::error::Error for NodeError {}
