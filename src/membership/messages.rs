/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Messages exchanged between a [`RemoteMembership`](super::RemoteMembership) client and the process
//! that hosts the membership service.
//!
//! Messages are serialized using Borsh. Every request gets exactly one response; which
//! [`MembershipResponse`] variant answers which [`MembershipRequest`] is documented on the request.

use std::io;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::data_types::{NodeAddress, RecordKey};

use super::{MembershipClient, MembershipError};

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum MembershipRequest {
    /// Answered with [`MembershipResponse::Ack`].
    Heartbeat(NodeAddress),

    /// Answered with [`MembershipResponse::Nodes`], holding the live replicas of the key.
    FindLiveReplicas(RecordKey),

    /// Answered with [`MembershipResponse::Nodes`], holding the configured node set.
    ListAll,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum MembershipResponse {
    Ack,
    Nodes(Vec<NodeAddress>),
    Error(MembershipErrorCode),
}

/// Intermediate representation of [`MembershipError`] for serialization.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum MembershipErrorCode {
    NotEnoughDaemons,
    UnknownNode,
    Unavailable(String),
}

impl From<MembershipError> for MembershipErrorCode {
    fn from(value: MembershipError) -> Self {
        match value {
            MembershipError::NotEnoughDaemons => MembershipErrorCode::NotEnoughDaemons,
            MembershipError::UnknownNode => MembershipErrorCode::UnknownNode,
            MembershipError::Unavailable(reason) => MembershipErrorCode::Unavailable(reason),
        }
    }
}

impl From<MembershipErrorCode> for MembershipError {
    fn from(value: MembershipErrorCode) -> Self {
        match value {
            MembershipErrorCode::NotEnoughDaemons => MembershipError::NotEnoughDaemons,
            MembershipErrorCode::UnknownNode => MembershipError::UnknownNode,
            MembershipErrorCode::Unavailable(reason) => MembershipError::Unavailable(reason),
        }
    }
}

impl<T> From<Result<T, MembershipError>> for MembershipResponse
where
    T: Into<MembershipResponse>,
{
    fn from(value: Result<T, MembershipError>) -> Self {
        match value {
            Ok(response) => response.into(),
            Err(err) => MembershipResponse::Error(err.into()),
        }
    }
}

impl From<()> for MembershipResponse {
    fn from(_: ()) -> Self {
        MembershipResponse::Ack
    }
}

impl From<Vec<NodeAddress>> for MembershipResponse {
    fn from(value: Vec<NodeAddress>) -> Self {
        MembershipResponse::Nodes(value)
    }
}

/// Handle one serialized `request` against `membership`, and return the serialized response.
///
/// A request that cannot be deserialized is answered with [`MembershipErrorCode::Unavailable`] rather
/// than an error, so that the client learns why its call failed.
pub fn serve_request<M: MembershipClient + ?Sized>(
    membership: &M,
    request: &[u8],
) -> io::Result<Vec<u8>> {
    let response: MembershipResponse = match MembershipRequest::try_from_slice(request) {
        Ok(MembershipRequest::Heartbeat(node)) => membership.heartbeat(&node).into(),
        Ok(MembershipRequest::FindLiveReplicas(key)) => membership.find_live_replicas(key).into(),
        Ok(MembershipRequest::ListAll) => membership.list_all().into(),
        Err(err) => {
            log::warn!("Received a malformed membership request: {}", err);
            MembershipResponse::Error(MembershipErrorCode::Unavailable(format!(
                "malformed request: {}",
                err
            )))
        }
    };
    response.try_to_vec()
}
