// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Background derivation worker and the channel used to reach it
//!
//! An offloaded strategy talks to its worker through a [`WorkerTransport`]:
//! one request in, exactly one response out. [`ChannelTransport`] implements
//! that over a tokio `mpsc` queue with a `oneshot` reply per request, and
//! [`DerivationWorker`] is a worker that serves such a queue.
//!
//! # Wire format
//!
//! ```json
//! { "type": "deriveAddressRange", "node": { ... }, "version": 0, "firstIndex": 0, "lastIndex": 9 }
//! ```
//!
//! is answered with
//!
//! ```json
//! { "addresses": ["1...", "1..."] }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::encoding::{derive_range, AddressVersion};
use crate::errors::TransportError;
use crate::node::NodeDescriptor;
use crate::range::{AddressRange, DerivedAddresses};
use crate::spans;

/// A request sent to a background worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerRequest {
    /// Derive the addresses of `first_index..=last_index` under `node`
    #[serde(rename_all = "camelCase")]
    DeriveAddressRange {
        /// Node whose children are derived
        node: NodeDescriptor,
        /// Address encoding version
        version: AddressVersion,
        /// First index (inclusive)
        first_index: u32,
        /// Last index (inclusive)
        last_index: u32,
    },
}

/// A worker's successful reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResponse {
    /// Derived addresses in ascending index order
    pub addresses: DerivedAddresses,
}

/// Request/response channel to a background execution context
///
/// Each call carries exactly one request and resolves with exactly one
/// response. Timeouts, retries and serialization are the transport's own
/// business; whatever it reports is surfaced to the caller unchanged.
#[async_trait]
pub trait WorkerTransport: Send + Sync {
    /// Send a request and wait for its response
    async fn request(&self, request: WorkerRequest) -> Result<WorkerResponse, TransportError>;
}

type Envelope = (
    WorkerRequest,
    oneshot::Sender<Result<WorkerResponse, TransportError>>,
);

/// In-process transport over a bounded tokio channel
///
/// Cloning yields another handle to the same worker. The worker shuts down
/// once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<Envelope>,
}

impl ChannelTransport {
    /// Create a transport and the receiving end a worker serves
    pub fn channel(queue_depth: usize) -> (Self, WorkerInbox) {
        let (sender, receiver) = mpsc::channel(queue_depth.max(1));
        (Self { sender }, WorkerInbox { receiver })
    }
}

#[async_trait]
impl WorkerTransport for ChannelTransport {
    async fn request(&self, request: WorkerRequest) -> Result<WorkerResponse, TransportError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send((request, reply))
            .await
            .map_err(|_| TransportError::Closed)?;

        response.await.map_err(|_| TransportError::NoResponse)?
    }
}

/// Receiving end of a [`ChannelTransport`]
#[derive(Debug)]
pub struct WorkerInbox {
    receiver: mpsc::Receiver<Envelope>,
}

impl WorkerInbox {
    /// Receive the next request and the handle to answer it with
    ///
    /// Returns `None` once every transport handle has been dropped.
    pub async fn next(&mut self) -> Option<(WorkerRequest, WorkerReply)> {
        let (request, reply) = self.receiver.recv().await?;
        Some((request, WorkerReply { reply }))
    }
}

/// One-shot handle for answering a single request
#[derive(Debug)]
pub struct WorkerReply {
    reply: oneshot::Sender<Result<WorkerResponse, TransportError>>,
}

impl WorkerReply {
    /// Deliver the response; returns `false` if the requester stopped waiting
    pub fn send(self, response: Result<WorkerResponse, TransportError>) -> bool {
        self.reply.send(response).is_ok()
    }
}

/// Handle a single request
///
/// Derivation failures are reported back as [`TransportError::Remote`], the
/// same way a failure inside a separate execution context would arrive.
pub fn handle_request(request: WorkerRequest) -> Result<WorkerResponse, TransportError> {
    match request {
        WorkerRequest::DeriveAddressRange {
            node,
            version,
            first_index,
            last_index,
        } => {
            let span = spans::worker_request(first_index, last_index, version.as_u32());
            let _guard = span.enter();

            let range = AddressRange::new(first_index, last_index).map_err(TransportError::remote)?;
            let xpub = node.to_xpub().map_err(TransportError::remote)?;
            let addresses = derive_range(&xpub, version, range).map_err(TransportError::remote)?;

            debug!(count = addresses.len(), "Derived address range");
            Ok(WorkerResponse { addresses })
        }
    }
}

/// Reference background worker serving a [`ChannelTransport`]
///
/// Requests are handled one at a time; each derivation runs on tokio's
/// blocking pool so elliptic-curve work never stalls the async executor.
#[derive(Debug)]
pub struct DerivationWorker {
    handle: JoinHandle<()>,
}

impl DerivationWorker {
    /// Spawn a worker on the current tokio runtime
    ///
    /// Returns the worker and a transport connected to it.
    pub fn spawn(queue_depth: usize) -> (Self, ChannelTransport) {
        let (transport, inbox) = ChannelTransport::channel(queue_depth);
        let handle = tokio::spawn(Self::run(inbox));
        (Self { handle }, transport)
    }

    async fn run(mut inbox: WorkerInbox) {
        debug!("Derivation worker started");

        while let Some((request, reply)) = inbox.next().await {
            let response = tokio::task::spawn_blocking(move || handle_request(request))
                .await
                .unwrap_or_else(|e| Err(TransportError::remote(e)));

            if !reply.send(response) {
                warn!("Requester went away before the worker replied");
            }
        }

        debug!("Derivation worker stopped, all transports dropped");
    }

    /// Wait for the worker to stop
    ///
    /// The worker stops once every [`ChannelTransport`] connected to it is dropped.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Derivation worker task failed");
        }
    }
}
