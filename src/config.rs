/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Configuration of the [router](crate::router::QuorumRouter) and of the
//! [coordinator](crate::quorum::Coordinator), as specified by the operator.
//!
//! Both configurations are constructed using the builder pattern, for example:
//!
//! ```ignore
//! let router_configuration =
//!     RouterConfiguration::builder()
//!     .nodes(nodes)
//!     .replication_factor(ReplicationFactor::new(3))
//!     .min_redundancy(MinRedundancy::new(2))
//!     .forget_timeout(Duration::from_secs(3))
//!     .log_events(true)
//!     .build();
//!
//! let coordinator_configuration =
//!     CoordinatorConfiguration::builder()
//!     .replication_factor(ReplicationFactor::new(3))
//!     .min_redundancy(MinRedundancy::new(2))
//!     .build();
//! ```
//!
//! ## Agreeing on node selection
//!
//! The Put/Del path selects nodes through the router, whereas the Get path selects nodes inside the
//! coordinator. For reads to find what writes stored, the router and every coordinator must be
//! configured with the same replication factor and the same [`NodeHasher`].

use std::sync::Arc;
use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::selector::{NodeHasher, NodeSelector};
use crate::types::{
    data_types::{MinRedundancy, NodeAddress, ReplicationFactor},
    parameters::{ConfigurationError, QuorumParameters},
};

/// How long the coordinator waits after a failed attempt to fetch the node list before trying again.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Parameters required to start a [`QuorumRouter`](crate::router::QuorumRouter).
#[derive(TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [RouterConfiguration]. On the builder call the following methods to construct a valid [RouterConfiguration].

    Required:
    - `.nodes(...)`
    - `.replication_factor(...)`
    - `.min_redundancy(...)`
    - `.forget_timeout(...)`

    Optional:
    - `.hasher(...)`
    - `.log_events(...)`
"))]
pub struct RouterConfiguration {
    #[builder(setter(doc = "Set the configured node set served by the router. Required."))]
    pub nodes: Vec<NodeAddress>,
    #[builder(setter(doc = "Set the number of nodes each key is assigned to. Required."))]
    pub replication_factor: ReplicationFactor,
    #[builder(setter(doc = "Set the number of live nodes required to serve a key. Required."))]
    pub min_redundancy: MinRedundancy,
    #[builder(setter(doc = "Set how long a node stays live after its latest heartbeat. Required."))]
    pub forget_timeout: Duration,
    #[builder(default, setter(strip_option, doc = "Set the rendezvous hasher. Defaults to SHA-256. Optional."))]
    pub hasher: Option<Arc<dyn NodeHasher>>,
    #[builder(default = false, setter(doc = "Enable event logging? Optional, defaults to false."))]
    pub log_events: bool,
}

impl RouterConfiguration {
    pub(crate) fn parameters(&self) -> Result<QuorumParameters, ConfigurationError> {
        QuorumParameters::new(self.replication_factor, self.min_redundancy)
    }

    pub(crate) fn selector(&self) -> NodeSelector {
        selector(&self.hasher, self.replication_factor)
    }
}

/// Parameters required to start a [`Coordinator`](crate::quorum::Coordinator).
#[derive(TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [CoordinatorConfiguration]. On the builder call the following methods to construct a valid [CoordinatorConfiguration].

    Required:
    - `.replication_factor(...)`
    - `.min_redundancy(...)`

    Optional:
    - `.init_timeout(...)`
    - `.hasher(...)`
    - `.log_events(...)`
"))]
pub struct CoordinatorConfiguration {
    #[builder(setter(doc = "Set the number of nodes each key is assigned to. Required."))]
    pub replication_factor: ReplicationFactor,
    #[builder(setter(doc = "Set the number of matching responses required for an operation to succeed. Required."))]
    pub min_redundancy: MinRedundancy,
    #[builder(default = DEFAULT_INIT_TIMEOUT, setter(doc = "Set the pause between attempts to fetch the node list. Optional, defaults to 100ms."))]
    pub init_timeout: Duration,
    #[builder(default, setter(strip_option, doc = "Set the rendezvous hasher. Must match the router's. Defaults to SHA-256. Optional."))]
    pub hasher: Option<Arc<dyn NodeHasher>>,
    #[builder(default = false, setter(doc = "Enable event logging? Optional, defaults to false."))]
    pub log_events: bool,
}

impl CoordinatorConfiguration {
    pub(crate) fn parameters(&self) -> Result<QuorumParameters, ConfigurationError> {
        QuorumParameters::new(self.replication_factor, self.min_redundancy)
    }

    pub(crate) fn selector(&self) -> NodeSelector {
        selector(&self.hasher, self.replication_factor)
    }
}

fn selector(hasher: &Option<Arc<dyn NodeHasher>>, replication_factor: ReplicationFactor) -> NodeSelector {
    match hasher {
        Some(hasher) => NodeSelector::new(Arc::clone(hasher), replication_factor),
        None => NodeSelector::with_default_hasher(replication_factor),
    }
}

#[test]
fn coordinator_configuration_defaults_test() {
    let configuration = CoordinatorConfiguration::builder()
        .replication_factor(ReplicationFactor::new(3))
        .min_redundancy(MinRedundancy::new(2))
        .build();

    assert_eq!(configuration.init_timeout, DEFAULT_INIT_TIMEOUT);
    assert!(configuration.hasher.is_none());
    assert!(!configuration.log_events);
    assert!(configuration.parameters().is_ok());
}
