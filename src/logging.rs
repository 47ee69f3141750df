/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the `log_events` flag of the
//! [router's](crate::config::RouterConfiguration) or the
//! [coordinator's](crate::config::CoordinatorConfiguration) configuration.
//!
//! The crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values are
//! always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how a [Heartbeat](crate::events::HeartbeatEvent) is printed:
//!
//! ```text
//! Heartbeat, 1701329264, MTAuMC4
//! ```
//!
//! In the snippet, the third value is the first seven characters of the Base64 encoding of the address
//! of the node that sent the heartbeat.

use std::time::SystemTime;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};

use crate::events::*;

// Names of each event in PascalCase for printing:
pub const HEARTBEAT: &str = "Heartbeat";
pub const REJECT_HEARTBEAT: &str = "RejectHeartbeat";
pub const FIND_LIVE_REPLICAS: &str = "FindLiveReplicas";

pub const FAN_OUT: &str = "FanOut";
pub const WRITE_QUORUM: &str = "WriteQuorum";
pub const READ_QUORUM: &str = "ReadQuorum";

pub const BOOTSTRAP_RETRY: &str = "BootstrapRetry";
pub const BOOTSTRAP: &str = "Bootstrap";

/// Pointer to a closure that logs an event of type `T`.
pub(crate) type LoggerPtr<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Implemented by event types. Used to get a closure that logs the event.
pub(crate) trait Logger {
    /// Returns a pointer to the default logging handler for a given event type.
    fn get_logger() -> LoggerPtr<Self>;
}

/// Returns the default logger for `T` if `log_events` is set.
pub(crate) fn logger_if<T: Logger>(log_events: bool) -> Option<LoggerPtr<T>> {
    if log_events {
        Some(T::get_logger())
    } else {
        None
    }
}

/// Build an event with `make_event` and pass it to `logger`, if there is one.
pub(crate) fn emit<T>(logger: &Option<LoggerPtr<T>>, make_event: impl FnOnce() -> T) {
    if let Some(logger) = logger {
        logger(&make_event())
    }
}

impl Logger for HeartbeatEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |heartbeat_event: &HeartbeatEvent| {
            log::debug!(
                "{}, {}, {}",
                HEARTBEAT,
                secs_since_unix_epoch(heartbeat_event.timestamp),
                first_seven_base64_chars(heartbeat_event.node.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for RejectHeartbeatEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |reject_heartbeat_event: &RejectHeartbeatEvent| {
            log::warn!(
                "{}, {}, {}",
                REJECT_HEARTBEAT,
                secs_since_unix_epoch(reject_heartbeat_event.timestamp),
                first_seven_base64_chars(reject_heartbeat_event.node.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for FindLiveReplicasEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |find_live_replicas_event: &FindLiveReplicasEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                FIND_LIVE_REPLICAS,
                secs_since_unix_epoch(find_live_replicas_event.timestamp),
                find_live_replicas_event.key,
                find_live_replicas_event.selected,
                find_live_replicas_event.live
            )
        };
        Box::new(logger)
    }
}

impl Logger for FanOutEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |fan_out_event: &FanOutEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                FAN_OUT,
                secs_since_unix_epoch(fan_out_event.timestamp),
                fan_out_event.operation,
                fan_out_event.key,
                fan_out_event.nodes
            )
        };
        Box::new(logger)
    }
}

impl Logger for WriteQuorumEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |write_quorum_event: &WriteQuorumEvent| {
            log::info!(
                "{}, {}, {}, {}, {}, {}, {}",
                WRITE_QUORUM,
                secs_since_unix_epoch(write_quorum_event.timestamp),
                write_quorum_event.operation,
                write_quorum_event.key,
                write_quorum_event.successes,
                write_quorum_event.failures,
                write_quorum_event.reached
            )
        };
        Box::new(logger)
    }
}

impl Logger for ReadQuorumEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |read_quorum_event: &ReadQuorumEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                READ_QUORUM,
                secs_since_unix_epoch(read_quorum_event.timestamp),
                read_quorum_event.key,
                read_quorum_event.responses,
                read_quorum_event.reached
            )
        };
        Box::new(logger)
    }
}

impl Logger for BootstrapRetryEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |bootstrap_retry_event: &BootstrapRetryEvent| {
            log::warn!(
                "{}, {}, {}",
                BOOTSTRAP_RETRY,
                secs_since_unix_epoch(bootstrap_retry_event.timestamp),
                bootstrap_retry_event.attempt
            )
        };
        Box::new(logger)
    }
}

impl Logger for BootstrapEvent {
    fn get_logger() -> LoggerPtr<Self> {
        let logger = |bootstrap_event: &BootstrapEvent| {
            log::info!(
                "{}, {}, {}, {}",
                BOOTSTRAP,
                secs_since_unix_epoch(bootstrap_event.timestamp),
                bootstrap_event.attempts,
                bootstrap_event.nodes
            )
        };
        Box::new(logger)
    }
}

// Get a more readable representation of a bytesequence by base64-encoding it and taking the first 7 characters.
pub(crate) fn first_seven_base64_chars(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);
    if encoded.len() > 7 {
        encoded[0..7].to_string()
    } else {
        encoded
    }
}

fn secs_since_unix_epoch(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

#[test]
fn first_seven_base64_chars_test() {
    assert_eq!(first_seven_base64_chars(b"10.0.0.1:9000"), "MTAuMC4");
    assert_eq!(first_seven_base64_chars(b"a"), "YQ");
}
