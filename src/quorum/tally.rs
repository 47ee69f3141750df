/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Collectors that turn per-node results into a single quorum decision.
//!
//! - [`WriteTally`] is used by Put and Del. It is fed every result before a decision is asked of it.
//! - [`ReadTally`] is used by Get. It decides as soon as any value or error has been seen
//!   `min_redundancy` times.

use std::collections::HashMap;

use crate::node_client::NodeError;
use crate::types::data_types::MinRedundancy;

use super::QuorumError;

/// Counts the successes and the failures (grouped by error) of a Put or Del.
pub(crate) struct WriteTally {
    min_redundancy: MinRedundancy,
    successes: usize,
    // Grouped by error, in order of first occurrence.
    failures: Vec<(NodeError, usize)>,
}

impl WriteTally {
    pub(crate) fn new(min_redundancy: MinRedundancy) -> Self {
        Self {
            min_redundancy,
            successes: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn collect(&mut self, result: Result<(), NodeError>) {
        match result {
            Ok(()) => self.successes += 1,
            Err(err) => match self.failures.iter_mut().find(|(seen, _)| *seen == err) {
                Some((_, count)) => *count += 1,
                None => self.failures.push((err, 1)),
            },
        }
    }

    pub(crate) fn successes(&self) -> usize {
        self.successes
    }

    pub(crate) fn failures(&self) -> usize {
        self.failures.iter().map(|(_, count)| count).sum()
    }

    /// Decide the outcome of the operation from the results collected so far.
    ///
    /// 1. Enough successes: the operation succeeded.
    /// 2. Otherwise, if some error occurred at least `min_redundancy` times, that error is the outcome. If
    ///    several did, the most frequent one wins, and among equally frequent ones, the one seen first.
    /// 3. Otherwise, the quorum was not reached.
    pub(crate) fn outcome(&self) -> Result<(), QuorumError> {
        if self.min_redundancy.is_reached_by(self.successes) {
            return Ok(());
        }

        let mut dominant: Option<&(NodeError, usize)> = None;
        for failure in &self.failures {
            if self.min_redundancy.is_reached_by(failure.1)
                && dominant.map_or(true, |(_, count)| failure.1 > *count)
            {
                dominant = Some(failure);
            }
        }

        match dominant {
            Some((err, _)) => Err(QuorumError::Node(err.clone())),
            None => Err(QuorumError::QuorumNotReached),
        }
    }
}

/// Counts the values (by exact content) and errors returned by a Get.
pub(crate) struct ReadTally {
    min_redundancy: MinRedundancy,
    values: HashMap<Vec<u8>, usize>,
    errors: HashMap<NodeError, usize>,
}

impl ReadTally {
    pub(crate) fn new(min_redundancy: MinRedundancy) -> Self {
        Self {
            min_redundancy,
            values: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Count `result`, and return the outcome of the Get if `result` made its value or its error reach
    /// `min_redundancy`.
    pub(crate) fn collect(
        &mut self,
        result: Result<Vec<u8>, NodeError>,
    ) -> Option<Result<Vec<u8>, QuorumError>> {
        match result {
            Ok(value) => {
                let count = self.values.entry(value.clone()).or_insert(0);
                *count += 1;
                if self.min_redundancy.is_reached_by(*count) {
                    return Some(Ok(value));
                }
            }
            Err(err) => {
                let count = self.errors.entry(err.clone()).or_insert(0);
                *count += 1;
                if self.min_redundancy.is_reached_by(*count) {
                    return Some(Err(QuorumError::Node(err)));
                }
            }
        }
        None
    }
}
