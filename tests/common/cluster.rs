//! A quorum of storage nodes wired to a router and a coordinator, all in one process.

use std::{sync::Arc, time::Duration};

use quorum_kv::{
    config::{CoordinatorConfiguration, RouterConfiguration},
    quorum::Coordinator,
    router::QuorumRouter,
    types::data_types::{MinRedundancy, NodeAddress, RecordKey, ReplicationFactor},
};

use super::mem_cluster::MemCluster;

/// Long enough that no node is forgotten during a test, unless the test means it to.
pub(crate) const LONG_FORGET_TIMEOUT: Duration = Duration::from_secs(600);

pub(crate) fn addresses(n: usize) -> Vec<NodeAddress> {
    (0..n)
        .map(|i| NodeAddress::from(format!("192.168.0.{}:7000", i)))
        .collect()
}

pub(crate) struct Cluster {
    pub(crate) addresses: Vec<NodeAddress>,
    pub(crate) router: Arc<QuorumRouter>,
    pub(crate) storage: MemCluster,
    pub(crate) coordinator: Coordinator<MemCluster, Arc<QuorumRouter>>,
}

impl Cluster {
    /// Start a cluster of `n_nodes` nodes, every one of which has sent a heartbeat.
    pub(crate) fn start(n_nodes: usize, replication_factor: usize, min_redundancy: usize) -> Cluster {
        Cluster::start_partially_live(n_nodes, replication_factor, min_redundancy, n_nodes)
    }

    /// Start a cluster of `n_nodes` nodes, of which only the first `n_live` have sent a heartbeat.
    pub(crate) fn start_partially_live(
        n_nodes: usize,
        replication_factor: usize,
        min_redundancy: usize,
        n_live: usize,
    ) -> Cluster {
        let addresses = addresses(n_nodes);
        let router = Arc::new(
            QuorumRouter::new(
                RouterConfiguration::builder()
                    .nodes(addresses.clone())
                    .replication_factor(ReplicationFactor::new(replication_factor))
                    .min_redundancy(MinRedundancy::new(min_redundancy))
                    .forget_timeout(LONG_FORGET_TIMEOUT)
                    .log_events(true)
                    .build(),
            )
            .unwrap(),
        );
        for address in addresses.iter().take(n_live) {
            router.heartbeat(address).unwrap();
        }

        let storage = MemCluster::new(&addresses);
        let coordinator = Coordinator::new(
            CoordinatorConfiguration::builder()
                .replication_factor(ReplicationFactor::new(replication_factor))
                .min_redundancy(MinRedundancy::new(min_redundancy))
                .log_events(true)
                .build(),
            storage.clone(),
            Arc::clone(&router),
        )
        .unwrap();

        Cluster {
            addresses,
            router,
            storage,
            coordinator,
        }
    }

    /// The live replicas of `key`, as the router currently sees them.
    pub(crate) fn replicas(&self, key: RecordKey) -> Vec<NodeAddress> {
        self.router.find_live_replicas(key).unwrap()
    }
}
