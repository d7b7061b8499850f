// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Offloaded derivation strategy

use async_trait::async_trait;
use bip32::XPub;
use tracing::Instrument;

use crate::encoding::AddressVersion;
use crate::errors::{DeriveError, TransportError};
use crate::node::NodeDescriptor;
use crate::range::{AddressRange, DerivedAddresses};
use crate::source::AddressSource;
use crate::spans;
use crate::worker::{WorkerRequest, WorkerTransport};

/// Delegates each range to a background worker
///
/// The node is captured once as a [`NodeDescriptor`] at construction and sent
/// with every request; the strategy keeps no other state between calls.
/// Worker and channel failures reach the caller as [`DeriveError::Transport`].
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{constants::versions, AddressSource, DerivationWorker, WorkerSource};
///
/// let (_worker, transport) = DerivationWorker::spawn(32);
/// let source = WorkerSource::new(&xpub, versions::BITCOIN_P2PKH, transport);
/// let addresses = source.derive(0, 9).await?;
/// ```
#[derive(Debug)]
pub struct WorkerSource<T> {
    node: NodeDescriptor,
    version: AddressVersion,
    transport: T,
}

impl<T> WorkerSource<T>
where
    T: WorkerTransport,
{
    /// Create a strategy that derives children of `node` on the worker behind `transport`
    pub fn new(node: &XPub, version: AddressVersion, transport: T) -> Self {
        Self::from_descriptor(NodeDescriptor::from_xpub(node), version, transport)
    }

    /// Create a strategy from an already captured descriptor
    pub fn from_descriptor(node: NodeDescriptor, version: AddressVersion, transport: T) -> Self {
        Self {
            node,
            version,
            transport,
        }
    }

    /// The descriptor sent with every request
    pub fn node(&self) -> &NodeDescriptor {
        &self.node
    }
}

#[async_trait]
impl<T> AddressSource for WorkerSource<T>
where
    T: WorkerTransport,
{
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        let span = spans::derive_range(self.name(), first_index, last_index);

        async move {
            let range = AddressRange::new(first_index, last_index)?;
            let request = WorkerRequest::DeriveAddressRange {
                node: self.node.clone(),
                version: self.version,
                first_index,
                last_index,
            };

            let response = self.transport.request(request).await?;
            if response.addresses.len() != range.len() {
                return Err(TransportError::MalformedResponse {
                    expected: range.len(),
                    actual: response.addresses.len(),
                }
                .into());
            }

            Ok(response.addresses)
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "WorkerSource"
    }
}
