/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The router: the membership service that coordinators ask where a record lives.
//!
//! A [`QuorumRouter`] combines a [`NodeSelector`] with a [`MembershipTracker`]. Given a key, it selects
//! nodes over the full configured node set, then keeps only those that are currently live. If fewer than
//! `min_redundancy` remain, the request fails before any storage node is contacted.
//!
//! Note that liveness filtering happens *after* selection. A dead node is not replaced by the next node in
//! rendezvous order; it simply reduces the number of replicas that serve the key until it comes back.

use std::time::{Duration, SystemTime};

use crate::config::RouterConfiguration;
use crate::events::FindLiveReplicasEvent;
use crate::logging::{emit, logger_if, LoggerPtr};
use crate::membership::{MembershipClient, MembershipError, MembershipTracker};
use crate::selector::NodeSelector;
use crate::types::{
    data_types::{NodeAddress, RecordKey},
    parameters::{ConfigurationError, QuorumParameters},
};

pub struct QuorumRouter {
    tracker: MembershipTracker,
    selector: NodeSelector,
    parameters: QuorumParameters,
    find_live_replicas_logger: Option<LoggerPtr<FindLiveReplicasEvent>>,
}

impl QuorumRouter {
    /// Create a router for the node set in `configuration`.
    ///
    /// Fails if the quorum parameters are invalid, if the node set contains duplicates, or if fewer nodes
    /// are configured than the replication factor.
    pub fn new(configuration: RouterConfiguration) -> Result<Self, ConfigurationError> {
        let parameters = configuration.parameters()?;
        if configuration.nodes.len() < parameters.replication_factor().int() {
            return Err(ConfigurationError::NotEnoughDaemons {
                configured: configuration.nodes.len(),
                replication_factor: parameters.replication_factor(),
            });
        }

        let selector = configuration.selector();
        let find_live_replicas_logger = logger_if(configuration.log_events);
        let tracker = MembershipTracker::new(
            configuration.nodes,
            configuration.forget_timeout,
            configuration.log_events,
        )?;

        Ok(Self {
            tracker,
            selector,
            parameters,
            find_live_replicas_logger,
        })
    }

    /// Record a heartbeat from `node`. See [`MembershipTracker::heartbeat`].
    pub fn heartbeat(&self, node: &NodeAddress) -> Result<(), MembershipError> {
        self.tracker.heartbeat(node)
    }

    /// Get the live nodes that should store the record with `key`, in rendezvous order.
    ///
    /// Fails with [`MembershipError::NotEnoughDaemons`] if fewer than `min_redundancy` of the selected
    /// nodes are live.
    pub fn find_live_replicas(&self, key: RecordKey) -> Result<Vec<NodeAddress>, MembershipError> {
        let selected = self.selector.select(key, self.tracker.list_all());
        let live = self.tracker.live_subset(&selected);

        emit(&self.find_live_replicas_logger, || FindLiveReplicasEvent {
            timestamp: SystemTime::now(),
            key,
            selected: selected.len(),
            live: live.len(),
        });

        if !self.parameters.min_redundancy().is_reached_by(live.len()) {
            return Err(MembershipError::NotEnoughDaemons);
        }
        Ok(live)
    }

    /// Get the full configured node set.
    pub fn list_all(&self) -> Vec<NodeAddress> {
        self.tracker.list_all().to_vec()
    }

    pub fn tracker(&self) -> &MembershipTracker {
        &self.tracker
    }

    pub fn parameters(&self) -> QuorumParameters {
        self.parameters
    }

    pub fn forget_timeout(&self) -> Duration {
        self.tracker.forget_timeout()
    }
}

impl MembershipClient for QuorumRouter {
    fn heartbeat(&self, node: &NodeAddress) -> Result<(), MembershipError> {
        QuorumRouter::heartbeat(self, node)
    }

    fn find_live_replicas(&self, key: RecordKey) -> Result<Vec<NodeAddress>, MembershipError> {
        QuorumRouter::find_live_replicas(self, key)
    }

    fn list_all(&self) -> Result<Vec<NodeAddress>, MembershipError> {
        Ok(QuorumRouter::list_all(self))
    }
}
