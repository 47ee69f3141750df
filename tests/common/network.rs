//! In-process [`Transport`]s that carry membership requests to a [`QuorumRouter`].

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use quorum_kv::{
    membership::{messages::serve_request, Transport, TransportError},
    router::QuorumRouter,
    types::data_types::NodeAddress,
};

/// A transport stub that serves every request with a router in the same process.
#[derive(Clone)]
pub(crate) struct LoopbackTransport {
    router: Arc<QuorumRouter>,
}

impl LoopbackTransport {
    pub(crate) fn new(router: Arc<QuorumRouter>) -> Self {
        Self { router }
    }
}

impl Transport for LoopbackTransport {
    fn call(&self, _: &NodeAddress, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        serve_request(&*self.router, &request).map_err(|err| TransportError(err.to_string()))
    }
}

/// A [`LoopbackTransport`] that fails its first `failures` calls, as if the router were still starting up.
pub(crate) struct FlakyTransport {
    inner: LoopbackTransport,
    failures: usize,
    calls: Arc<AtomicUsize>,
}

impl FlakyTransport {
    pub(crate) fn new(router: Arc<QuorumRouter>, failures: usize) -> Self {
        Self {
            inner: LoopbackTransport::new(router),
            failures,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of every call made through this transport.
    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Transport for FlakyTransport {
    fn call(&self, peer: &NodeAddress, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(TransportError(String::from("connection refused")));
        }
        self.inner.call(peer, request)
    }
}
