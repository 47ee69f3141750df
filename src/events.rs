/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of the events emitted by the router and the coordinator for logging.
//!
//! Note: an event for a given action indicates that the action has been completed.

use std::fmt::{self, Display, Formatter};
use std::time::SystemTime;

use crate::types::data_types::{NodeAddress, RecordKey};

/// Client-facing operations served by the [coordinator](crate::quorum::Coordinator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Put,
    Del,
    Get,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Put => write!(f, "Put"),
            Operation::Del => write!(f, "Del"),
            Operation::Get => write!(f, "Get"),
        }
    }
}

/// A configured node's heartbeat was recorded.
pub struct HeartbeatEvent {
    pub timestamp: SystemTime,
    pub node: NodeAddress,
}

/// A heartbeat from a node outside the configured node set was rejected.
pub struct RejectHeartbeatEvent {
    pub timestamp: SystemTime,
    pub node: NodeAddress,
}

/// The router answered a `find_live_replicas` query.
pub struct FindLiveReplicasEvent {
    pub timestamp: SystemTime,
    pub key: RecordKey,
    pub selected: usize,
    pub live: usize,
}

/// The coordinator sent an operation to `nodes` nodes in parallel.
pub struct FanOutEvent {
    pub timestamp: SystemTime,
    pub operation: Operation,
    pub key: RecordKey,
    pub nodes: usize,
}

/// A Put or Del finished aggregating the results of all of its nodes.
pub struct WriteQuorumEvent {
    pub timestamp: SystemTime,
    pub operation: Operation,
    pub key: RecordKey,
    pub successes: usize,
    pub failures: usize,
    pub reached: bool,
}

/// A Get reached a decision, after having seen `responses` responses.
pub struct ReadQuorumEvent {
    pub timestamp: SystemTime,
    pub key: RecordKey,
    pub responses: usize,
    pub reached: bool,
}

/// Fetching the node list for the Get path failed, and will be retried.
pub struct BootstrapRetryEvent {
    pub timestamp: SystemTime,
    pub attempt: u64,
}

/// The node list for the Get path was fetched and cached.
pub struct BootstrapEvent {
    pub timestamp: SystemTime,
    pub attempts: u64,
    pub nodes: usize,
}
