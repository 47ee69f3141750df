/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [`MembershipTracker`], which records heartbeats and answers liveness queries.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant, SystemTime};

use crate::events::{HeartbeatEvent, RejectHeartbeatEvent};
use crate::logging::{emit, logger_if, LoggerPtr};
use crate::types::{data_types::NodeAddress, parameters::ConfigurationError};

use super::MembershipError;

/// Holds the configured node set and the time of the latest heartbeat of each node.
///
/// ## Concurrency
///
/// The configured node set never changes after construction, so it is read without locking. The
/// heartbeat times are kept behind a reader/writer lock: [`heartbeat`](Self::heartbeat) takes the write
/// lock once per call, and liveness queries take the read lock once for their whole pass.
pub struct MembershipTracker {
    // In the order they were configured.
    nodes: Vec<NodeAddress>,
    configured: HashSet<NodeAddress>,
    forget_timeout: Duration,
    last_heartbeats: RwLock<HashMap<NodeAddress, Instant>>,
    heartbeat_logger: Option<LoggerPtr<HeartbeatEvent>>,
    reject_heartbeat_logger: Option<LoggerPtr<RejectHeartbeatEvent>>,
}

impl MembershipTracker {
    /// Create a tracker for `nodes`, none of which is live until it sends its first heartbeat.
    ///
    /// Fails if `nodes` contains the same address twice.
    pub fn new(
        nodes: Vec<NodeAddress>,
        forget_timeout: Duration,
        log_events: bool,
    ) -> Result<Self, ConfigurationError> {
        let mut configured = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !configured.insert(node.clone()) {
                return Err(ConfigurationError::DuplicateNode { node: node.clone() });
            }
        }

        Ok(Self {
            nodes,
            configured,
            forget_timeout,
            last_heartbeats: RwLock::new(HashMap::new()),
            heartbeat_logger: logger_if(log_events),
            reject_heartbeat_logger: logger_if(log_events),
        })
    }

    /// Record that `node` is alive as of now.
    ///
    /// Fails with [`MembershipError::UnknownNode`], leaving the tracker untouched, if `node` is not in the
    /// configured node set.
    pub fn heartbeat(&self, node: &NodeAddress) -> Result<(), MembershipError> {
        if !self.configured.contains(node) {
            emit(&self.reject_heartbeat_logger, || RejectHeartbeatEvent {
                timestamp: SystemTime::now(),
                node: node.clone(),
            });
            return Err(MembershipError::UnknownNode);
        }

        self.last_heartbeats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(node.clone(), Instant::now());

        emit(&self.heartbeat_logger, || HeartbeatEvent {
            timestamp: SystemTime::now(),
            node: node.clone(),
        });
        Ok(())
    }

    /// Filter `candidates` down to the nodes that are live, preserving their relative order.
    ///
    /// The current time is read once, so a node whose heartbeat is about to expire is judged the same way
    /// throughout the pass.
    pub fn live_subset(&self, candidates: &[NodeAddress]) -> Vec<NodeAddress> {
        let now = Instant::now();
        let last_heartbeats = self
            .last_heartbeats
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        candidates
            .iter()
            .filter(|node| self.is_live_at(&last_heartbeats, node, now))
            .cloned()
            .collect()
    }

    /// Check whether `node` is currently live.
    pub fn is_live(&self, node: &NodeAddress) -> bool {
        let last_heartbeats = self
            .last_heartbeats
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        self.is_live_at(&last_heartbeats, node, Instant::now())
    }

    /// Get every currently live node, in configured order.
    pub fn live_nodes(&self) -> Vec<NodeAddress> {
        self.live_subset(&self.nodes)
    }

    /// Get the full configured node set, in configured order.
    pub fn list_all(&self) -> &[NodeAddress] {
        &self.nodes
    }

    pub fn forget_timeout(&self) -> Duration {
        self.forget_timeout
    }

    fn is_live_at(
        &self,
        last_heartbeats: &HashMap<NodeAddress, Instant>,
        node: &NodeAddress,
        now: Instant,
    ) -> bool {
        // A heartbeat recorded after `now` was read counts as age zero.
        last_heartbeats
            .get(node)
            .map_or(false, |last| now.saturating_duration_since(*last) < self.forget_timeout)
    }
}
