/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Client for a membership service that runs in another process.

use std::fmt::{self, Display, Formatter};

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::data_types::{NodeAddress, RecordKey};

use super::{
    messages::{MembershipRequest, MembershipResponse},
    MembershipClient, MembershipError,
};

/// Request-response transport between a [`RemoteMembership`] client and the process hosting the
/// membership service.
///
/// Implementations are responsible for their own connection management and timeouts. On the serving
/// side, each request should be passed to [`serve_request`](super::messages::serve_request).
pub trait Transport: Send + Sync {
    /// Deliver `request` to `peer` and wait for its response.
    fn call(&self, peer: &NodeAddress, request: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// A [`Transport`] failed to deliver a request or to obtain its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for MembershipError {
    fn from(value: TransportError) -> Self {
        MembershipError::Unavailable(value.0)
    }
}

/// [`MembershipClient`] that forwards every call to the membership service at `router` over `transport`.
///
/// Transport failures and unexpected responses surface as [`MembershipError::Unavailable`].
pub struct RemoteMembership<T: Transport> {
    transport: T,
    router: NodeAddress,
}

impl<T: Transport> RemoteMembership<T> {
    pub fn new(transport: T, router: NodeAddress) -> Self {
        Self { transport, router }
    }

    pub fn router(&self) -> &NodeAddress {
        &self.router
    }

    fn call(&self, request: MembershipRequest) -> Result<MembershipResponse, MembershipError> {
        let request_bytes = request
            .try_to_vec()
            .map_err(|err| MembershipError::Unavailable(err.to_string()))?;
        let response_bytes = self.transport.call(&self.router, request_bytes)?;
        match MembershipResponse::try_from_slice(&response_bytes) {
            Ok(MembershipResponse::Error(code)) => Err(code.into()),
            Ok(response) => Ok(response),
            Err(err) => Err(MembershipError::Unavailable(format!(
                "malformed response: {}",
                err
            ))),
        }
    }

    fn call_for_nodes(&self, request: MembershipRequest) -> Result<Vec<NodeAddress>, MembershipError> {
        match self.call(request)? {
            MembershipResponse::Nodes(nodes) => Ok(nodes),
            other => Err(unexpected(other)),
        }
    }
}

impl<T: Transport> MembershipClient for RemoteMembership<T> {
    fn heartbeat(&self, node: &NodeAddress) -> Result<(), MembershipError> {
        match self.call(MembershipRequest::Heartbeat(node.clone()))? {
            MembershipResponse::Ack => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    fn find_live_replicas(&self, key: RecordKey) -> Result<Vec<NodeAddress>, MembershipError> {
        self.call_for_nodes(MembershipRequest::FindLiveReplicas(key))
    }

    fn list_all(&self) -> Result<Vec<NodeAddress>, MembershipError> {
        self.call_for_nodes(MembershipRequest::ListAll)
    }
}

fn unexpected(response: MembershipResponse) -> MembershipError {
    MembershipError::Unavailable(format!("unexpected response: {:?}", response))
}
