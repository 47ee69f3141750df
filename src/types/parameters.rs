/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The pair of redundancy parameters shared by the router and the coordinator.

use std::fmt::{self, Display, Formatter};

use super::data_types::{MinRedundancy, NodeAddress, ReplicationFactor};

/// Validated pair of a [`ReplicationFactor`] `N` and a [`MinRedundancy`] `W`.
///
/// ## Invariants
///
/// A `QuorumParameters` can only be constructed if `1 <= W <= N`. Whether `N` is at most the size of the
/// configured node set is checked by the [router](crate::router::QuorumRouter), which is the only
/// component that knows the configured node set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuorumParameters {
    replication_factor: ReplicationFactor,
    min_redundancy: MinRedundancy,
}

impl QuorumParameters {
    /// Check that `replication_factor` and `min_redundancy` satisfy the
    /// [invariants](Self#invariants) and wrap them.
    pub fn new(
        replication_factor: ReplicationFactor,
        min_redundancy: MinRedundancy,
    ) -> Result<Self, ConfigurationError> {
        if min_redundancy.int() == 0 {
            return Err(ConfigurationError::ZeroMinRedundancy);
        }
        if min_redundancy.int() > replication_factor.int() {
            return Err(ConfigurationError::MinRedundancyExceedsReplicationFactor {
                min_redundancy,
                replication_factor,
            });
        }
        Ok(Self {
            replication_factor,
            min_redundancy,
        })
    }

    pub const fn replication_factor(&self) -> ReplicationFactor {
        self.replication_factor
    }

    pub const fn min_redundancy(&self) -> MinRedundancy {
        self.min_redundancy
    }
}

/// Enumerates the ways in which a configuration can be invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `W` was 0, which would make every operation trivially successful.
    ZeroMinRedundancy,

    /// `W` was larger than `N`, so no operation could ever succeed.
    MinRedundancyExceedsReplicationFactor {
        min_redundancy: MinRedundancy,
        replication_factor: ReplicationFactor,
    },

    /// The configured node set listed the same address more than once.
    DuplicateNode { node: NodeAddress },

    /// Fewer nodes were configured than the replication factor asks for.
    NotEnoughDaemons {
        configured: usize,
        replication_factor: ReplicationFactor,
    },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ZeroMinRedundancy => write!(f, "min redundancy must be at least 1"),
            ConfigurationError::MinRedundancyExceedsReplicationFactor {
                min_redundancy,
                replication_factor,
            } => write!(
                f,
                "min redundancy {} exceeds replication factor {}",
                min_redundancy, replication_factor
            ),
            ConfigurationError::DuplicateNode { node } => {
                write!(f, "node {} is configured more than once", node)
            }
            ConfigurationError::NotEnoughDaemons {
                configured,
                replication_factor,
            } => write!(
                f,
                "{} nodes configured, but the replication factor is {}",
                configured, replication_factor
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[test]
fn quorum_parameters_validation_test() {
    let ok = QuorumParameters::new(ReplicationFactor::new(5), MinRedundancy::new(3)).unwrap();
    assert_eq!(ok.replication_factor().int(), 5);
    assert_eq!(ok.min_redundancy().int(), 3);

    assert_eq!(
        QuorumParameters::new(ReplicationFactor::new(3), MinRedundancy::new(0)),
        Err(ConfigurationError::ZeroMinRedundancy)
    );
    assert!(matches!(
        QuorumParameters::new(ReplicationFactor::new(2), MinRedundancy::new(3)),
        Err(ConfigurationError::MinRedundancyExceedsReplicationFactor { .. })
    ));
}
