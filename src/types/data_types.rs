/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that exist only to store bytes or numbers, and do not have any major "active" behavior.

use std::fmt::{self, Debug, Display, Formatter};

use borsh::{BorshDeserialize, BorshSerialize};

/// Opaque identifier of a storage node, e.g., a network endpoint encoded as bytes.
///
/// # Ordering
///
/// `NodeAddress`es are totally ordered by comparing their bytes lexicographically. The ordering carries
/// no meaning beyond being a deterministic tie-breaker in [node selection](crate::selector).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct NodeAddress(Vec<u8>);

impl NodeAddress {
    /// Create a new `NodeAddress` wrapping `bytes`.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the bytes of this `NodeAddress`.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the number of bytes this `NodeAddress` occupies when hashed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NodeAddress {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for NodeAddress {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl Display for NodeAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Debug for NodeAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NodeAddress({})", self)
    }
}

/// Fixed-width identifier of a record.
///
/// # Canonical encoding
///
/// The canonical binary encoding of a `RecordKey` is the Borsh encoding of its inner `u32`, i.e., 4
/// little-endian bytes. This is the encoding fed into [`NodeHasher`](crate::selector::NodeHasher)s, and
/// therefore every process that selects nodes for a key must agree on it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct RecordKey(u32);

impl RecordKey {
    /// Size in bytes of the canonical encoding of a `RecordKey`.
    pub const ENCODED_LEN: usize = 4;

    /// Create a new `RecordKey` with an `int` value.
    pub const fn new(int: u32) -> Self {
        Self(int)
    }

    /// Get the `u32` value of this `RecordKey`.
    pub const fn int(&self) -> u32 {
        self.0
    }

    /// Get the canonical encoding of this `RecordKey`.
    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey({})", self.0)
    }
}

/// Number of nodes that a key is assigned to by the [selector](crate::selector::NodeSelector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplicationFactor(usize);

impl ReplicationFactor {
    /// Create a new `ReplicationFactor` with an `int` value.
    pub const fn new(int: usize) -> Self {
        Self(int)
    }

    /// Get the `usize` value of this `ReplicationFactor`.
    pub const fn int(&self) -> usize {
        self.0
    }
}

impl Display for ReplicationFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Minimum number of nodes that must succeed (writes) or agree (reads) for an operation to succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinRedundancy(usize);

impl MinRedundancy {
    /// Create a new `MinRedundancy` with an `int` value.
    pub const fn new(int: usize) -> Self {
        Self(int)
    }

    /// Get the `usize` value of this `MinRedundancy`.
    pub const fn int(&self) -> usize {
        self.0
    }

    /// Check whether `count` responses are enough to form a quorum.
    pub const fn is_reached_by(&self, count: usize) -> bool {
        count >= self.0
    }
}

impl Display for MinRedundancy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[test]
fn record_key_canonical_encoding_is_borsh_test() {
    let key = RecordKey::new(0x0403_0201);
    assert_eq!(key.try_to_vec().unwrap(), key.to_le_bytes().to_vec());
    assert_eq!(key.to_le_bytes(), [1, 2, 3, 4]);
    assert_eq!(RecordKey::ENCODED_LEN, key.to_le_bytes().len());
}

#[test]
fn node_address_ordering_is_bytewise_test() {
    let a = NodeAddress::from("10.0.0.1:9000");
    let b = NodeAddress::from("10.0.0.2:9000");
    assert!(a < b);
    assert_eq!(a.to_string(), "10.0.0.1:9000");
    assert_eq!(a.len(), 13);
}
