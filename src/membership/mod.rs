/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Cluster membership: which nodes make up the cluster, and which of them are live.
//!
//! ## Liveness
//!
//! Storage nodes periodically send heartbeats (for example through a [`HeartbeatSender`]) to the
//! [`MembershipTracker`]. A node is live if its latest heartbeat was received less than `forget_timeout`
//! ago. A node that never sent a heartbeat is not live.
//!
//! ## Clients
//!
//! Components that need membership information, namely the [coordinator](crate::quorum::Coordinator) and
//! heartbeat senders, access it through the [`MembershipClient`] trait. The trait is implemented by the
//! [`QuorumRouter`](crate::router::QuorumRouter) for in-process use, and by [`RemoteMembership`] for use
//! across a [`Transport`].

pub mod heartbeat;
pub use heartbeat::HeartbeatSender;

pub mod messages;

pub mod remote;
pub use remote::{RemoteMembership, Transport, TransportError};

pub mod tracker;
pub use tracker::MembershipTracker;

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use crate::types::data_types::{NodeAddress, RecordKey};

/// Access to the membership service, wherever it runs.
pub trait MembershipClient: Send + Sync {
    /// Report that `node` is alive.
    fn heartbeat(&self, node: &NodeAddress) -> Result<(), MembershipError>;

    /// Get the live nodes that should store the record with `key`, in selection order.
    fn find_live_replicas(&self, key: RecordKey) -> Result<Vec<NodeAddress>, MembershipError>;

    /// Get the full configured node set, live or not.
    fn list_all(&self) -> Result<Vec<NodeAddress>, MembershipError>;
}

impl<M: MembershipClient + ?Sized> MembershipClient for Arc<M> {
    fn heartbeat(&self, node: &NodeAddress) -> Result<(), MembershipError> {
        (**self).heartbeat(node)
    }

    fn find_live_replicas(&self, key: RecordKey) -> Result<Vec<NodeAddress>, MembershipError> {
        (**self).find_live_replicas(key)
    }

    fn list_all(&self) -> Result<Vec<NodeAddress>, MembershipError> {
        (**self).list_all()
    }
}

/// Enumerates the ways a call to a [`MembershipClient`] can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MembershipError {
    /// Fewer than `min_redundancy` of the nodes selected for a key are live.
    NotEnoughDaemons,

    /// A heartbeat was received from a node outside the configured node set.
    UnknownNode,

    /// The membership service could not be reached, or its response could not be understood.
    Unavailable(String),
}

impl Display for MembershipError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MembershipError::NotEnoughDaemons => write!(f, "not enough daemons"),
            MembershipError::UnknownNode => write!(f, "unknown daemon"),
            MembershipError::Unavailable(reason) => {
                write!(f, "membership service unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for MembershipError {}
