/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [`Coordinator`] type. Read the [module-level docs](super) for the protocol it follows.

use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, SystemTime};

use crate::config::CoordinatorConfiguration;
use crate::events::*;
use crate::logging::{emit, logger_if, LoggerPtr};
use crate::membership::MembershipClient;
use crate::node_client::{NodeClient, NodeError};
use crate::selector::NodeSelector;
use crate::types::{
    data_types::{NodeAddress, RecordKey},
    parameters::{ConfigurationError, QuorumParameters},
};

use super::{
    fan_out::fan_out,
    tally::{ReadTally, WriteTally},
    QuorumError,
};

/// Serves Put, Del, and Get by replicating them on a quorum of storage nodes.
///
/// A `Coordinator` can be shared between threads (e.g., behind an `Arc`), and serves concurrent calls
/// independently of each other.
pub struct Coordinator<C: NodeClient, M: MembershipClient> {
    node_client: Arc<C>,
    membership: M,
    selector: NodeSelector,
    parameters: QuorumParameters,
    init_timeout: Duration,
    // Written once, by the first Get.
    nodes: OnceLock<Vec<NodeAddress>>,
    loggers: CoordinatorLoggers,
}

struct CoordinatorLoggers {
    fan_out: Option<LoggerPtr<FanOutEvent>>,
    write_quorum: Option<LoggerPtr<WriteQuorumEvent>>,
    read_quorum: Option<LoggerPtr<ReadQuorumEvent>>,
    bootstrap_retry: Option<LoggerPtr<BootstrapRetryEvent>>,
    bootstrap: Option<LoggerPtr<BootstrapEvent>>,
}

impl CoordinatorLoggers {
    fn new(log_events: bool) -> Self {
        Self {
            fan_out: logger_if(log_events),
            write_quorum: logger_if(log_events),
            read_quorum: logger_if(log_events),
            bootstrap_retry: logger_if(log_events),
            bootstrap: logger_if(log_events),
        }
    }
}

impl<C: NodeClient, M: MembershipClient> Coordinator<C, M> {
    /// Create a coordinator that reaches storage nodes through `node_client` and the membership service
    /// through `membership`.
    ///
    /// The membership service is not contacted until the first operation.
    pub fn new(
        configuration: CoordinatorConfiguration,
        node_client: C,
        membership: M,
    ) -> Result<Self, ConfigurationError> {
        let parameters = configuration.parameters()?;
        Ok(Self {
            node_client: Arc::new(node_client),
            membership,
            selector: configuration.selector(),
            parameters,
            init_timeout: configuration.init_timeout,
            nodes: OnceLock::new(),
            loggers: CoordinatorLoggers::new(configuration.log_events),
        })
    }

    /// Store `value` under `key` on the live replicas of `key`.
    pub fn put(&self, key: RecordKey, value: &[u8]) -> Result<(), QuorumError> {
        let value: Arc<[u8]> = Arc::from(value);
        self.put_del(Operation::Put, key, move |client, node| {
            client.put(node, key, &value)
        })
    }

    /// Delete `key` from the live replicas of `key`.
    pub fn del(&self, key: RecordKey) -> Result<(), QuorumError> {
        self.put_del(Operation::Del, key, move |client, node| client.del(node, key))
    }

    /// Read the value stored under `key`, as agreed on by at least `min_redundancy` replicas.
    ///
    /// The first call fetches the node list from the membership service, retrying every `init_timeout`
    /// until it succeeds. Concurrent first calls all wait for that single fetch.
    pub fn get(&self, key: RecordKey) -> Result<Vec<u8>, QuorumError> {
        let nodes = self.selector.select(key, self.cached_nodes());
        if !self.parameters.min_redundancy().is_reached_by(nodes.len()) {
            return Err(QuorumError::NotEnoughDaemons);
        }

        let results = fan_out(&self.node_client, &nodes, move |client, node| {
            client.get(node, key)
        });
        emit(&self.loggers.fan_out, || FanOutEvent {
            timestamp: SystemTime::now(),
            operation: Operation::Get,
            key,
            nodes: nodes.len(),
        });

        let mut tally = ReadTally::new(self.parameters.min_redundancy());
        let mut responses = 0;
        for result in results.iter().take(nodes.len()) {
            responses += 1;
            if let Some(outcome) = tally.collect(result) {
                emit(&self.loggers.read_quorum, || ReadQuorumEvent {
                    timestamp: SystemTime::now(),
                    key,
                    responses,
                    reached: true,
                });
                return outcome;
            }
        }

        emit(&self.loggers.read_quorum, || ReadQuorumEvent {
            timestamp: SystemTime::now(),
            key,
            responses,
            reached: false,
        });
        Err(QuorumError::QuorumNotReached)
    }

    /// Get the node list that Get selects nodes from, fetching it first if no Get has done so yet.
    pub fn cached_nodes(&self) -> &[NodeAddress] {
        self.nodes.get_or_init(|| self.fetch_nodes())
    }

    fn put_del<F>(&self, operation: Operation, key: RecordKey, job: F) -> Result<(), QuorumError>
    where
        F: Fn(&C, &NodeAddress) -> Result<(), NodeError> + Send + Sync + 'static,
    {
        let nodes = self.membership.find_live_replicas(key)?;
        if !self.parameters.min_redundancy().is_reached_by(nodes.len()) {
            return Err(QuorumError::NotEnoughDaemons);
        }

        let results = fan_out(&self.node_client, &nodes, job);
        emit(&self.loggers.fan_out, || FanOutEvent {
            timestamp: SystemTime::now(),
            operation,
            key,
            nodes: nodes.len(),
        });

        let mut tally = WriteTally::new(self.parameters.min_redundancy());
        for result in results.iter().take(nodes.len()) {
            tally.collect(result);
        }

        let outcome = tally.outcome();
        emit(&self.loggers.write_quorum, || WriteQuorumEvent {
            timestamp: SystemTime::now(),
            operation,
            key,
            successes: tally.successes(),
            failures: tally.failures(),
            reached: outcome.is_ok(),
        });
        outcome
    }

    fn fetch_nodes(&self) -> Vec<NodeAddress> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.membership.list_all() {
                Ok(nodes) => {
                    emit(&self.loggers.bootstrap, || BootstrapEvent {
                        timestamp: SystemTime::now(),
                        attempts: attempt,
                        nodes: nodes.len(),
                    });
                    return nodes;
                }
                Err(err) => {
                    log::debug!("Fetching the node list failed: {}", err);
                    emit(&self.loggers.bootstrap_retry, || BootstrapRetryEvent {
                        timestamp: SystemTime::now(),
                        attempt,
                    });
                    thread::sleep(self.init_timeout);
                }
            }
        }
    }
}
