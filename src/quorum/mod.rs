/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The client-facing entry point: replicating Put, Del, and Get on a quorum of storage nodes.
//!
//! ## Writes
//!
//! [Put](Coordinator::put) and [Del](Coordinator::del) ask the membership service for the *live* nodes that
//! should store the key, send the operation to all of them in parallel, and wait for every one of them to
//! answer. Waiting for all answers (instead of returning on the first quorum of successes) gives a stable
//! count of every kind of failure, which is needed to report a dominant error.
//!
//! ## Reads
//!
//! [Get](Coordinator::get) selects nodes locally, over a node list that is fetched from the membership
//! service on the first Get and cached for the lifetime of the coordinator. It then sends the Get to all
//! selected nodes in parallel, and returns as soon as `min_redundancy` nodes agree on the same value, or
//! fail with the same error.
//!
//! Unlike writes, reads do not consult liveness: a read may target a node that a concurrent write skipped
//! because it was not live. The cached node list is also never refreshed, so membership changes after the
//! first Get are not seen by the read path.
//!
//! ## Outcomes
//!
//! Failures of individual nodes are never returned as such. Every operation ends in one of:
//! - Success.
//! - [`QuorumError::NotEnoughDaemons`]: too few nodes were available to even try.
//! - [`QuorumError::Node`]: the same error was returned by at least `min_redundancy` nodes.
//! - [`QuorumError::QuorumNotReached`]: nodes disagreed, and no outcome was shared by enough of them.
//! - [`QuorumError::Membership`]: the membership service could not answer a Put or Del.

pub mod coordinator;
pub use coordinator::Coordinator;

pub(crate) mod fan_out;

pub(crate) mod tally;

use std::fmt::{self, Display, Formatter};

use crate::membership::MembershipError;
use crate::node_client::NodeError;

/// Enumerates the ways a [`Coordinator`] operation can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuorumError {
    /// Fewer than `min_redundancy` nodes were selected or live. No node was contacted.
    NotEnoughDaemons,

    /// The operation reached every selected node, but neither successes, nor any single value, nor any
    /// single error, were seen `min_redundancy` times.
    QuorumNotReached,

    /// At least `min_redundancy` nodes failed with this same error.
    Node(NodeError),

    /// The membership service failed for a reason other than [`MembershipError::NotEnoughDaemons`].
    Membership(MembershipError),
}

impl From<MembershipError> for QuorumError {
    fn from(value: MembershipError) -> Self {
        match value {
            MembershipError::NotEnoughDaemons => QuorumError::NotEnoughDaemons,
            other => QuorumError::Membership(other),
        }
    }
}

impl Display for QuorumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QuorumError::NotEnoughDaemons => write!(f, "not enough daemons"),
            QuorumError::QuorumNotReached => write!(f, "quorum not reached"),
            QuorumError::Node(err) => Display::fmt(err, f),
            QuorumError::Membership(err) => Display::fmt(err, f),
        }
    }
}

impl std::error::Error for QuorumError {}
