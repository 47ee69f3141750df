/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Replica selection and quorum orchestration for a replicated key-value store.
//!
//! Records are identified by a [`RecordKey`](types::data_types::RecordKey) and stored on a set of storage
//! nodes. This crate decides *which* nodes store a record, keeps track of *which* nodes are alive, and
//! replicates client operations on enough of them. It does not store records itself: library users plug
//! in a [`NodeClient`](node_client::NodeClient) that talks to their storage nodes.
//!
//! ## Components
//!
//! - [`selector`]: rendezvous hashing, mapping a key to an ordered set of up to `N` nodes.
//! - [`membership`]: heartbeat-based liveness tracking, and the client interface to reach it.
//! - [`router`]: the membership service that coordinators query for the live replicas of a key.
//! - [`quorum`]: the client-facing [`Coordinator`](quorum::Coordinator) that fans operations out and
//!   decides their outcome.
//!
//! ## Getting started
//!
//! ```ignore
//! let router = Arc::new(QuorumRouter::new(
//!     RouterConfiguration::builder()
//!         .nodes(nodes.clone())
//!         .replication_factor(ReplicationFactor::new(3))
//!         .min_redundancy(MinRedundancy::new(2))
//!         .forget_timeout(Duration::from_secs(3))
//!         .build(),
//! )?);
//!
//! // On every storage node.
//! let heartbeats = HeartbeatSender::start(my_address, Arc::clone(&router), Duration::from_secs(1));
//!
//! let coordinator = Coordinator::new(
//!     CoordinatorConfiguration::builder()
//!         .replication_factor(ReplicationFactor::new(3))
//!         .min_redundancy(MinRedundancy::new(2))
//!         .build(),
//!     my_node_client,
//!     Arc::clone(&router),
//! )?;
//!
//! coordinator.put(RecordKey::new(1), b"hello")?;
//! assert_eq!(coordinator.get(RecordKey::new(1))?, b"hello");
//! ```

pub mod config;

pub mod events;

pub(crate) mod logging;

pub mod membership;

pub mod node_client;

pub mod quorum;

pub mod router;

pub mod selector;

pub mod types;
