// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The address source capability shared by strategies and decorators.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::DeriveError;
use crate::range::DerivedAddresses;

/// Anything that can derive a contiguous range of addresses
///
/// Implemented by the derivation strategies ([`LocalSource`](crate::LocalSource),
/// [`WorkerSource`](crate::WorkerSource)) and by the decorators that wrap them
/// ([`PrefetchingSource`](crate::PrefetchingSource),
/// [`CachingSource`](crate::CachingSource)). Decorators are generic over this
/// trait and know nothing about what they wrap.
///
/// # Contract
///
/// For `first_index <= last_index < 2^31`, a successful call returns exactly
/// `last_index - first_index + 1` addresses in ascending index order. Any
/// other input fails with [`DeriveError::InvalidRange`].
///
/// # Panics
///
/// Implementations may require a tokio runtime.
/// [`PrefetchingSource`](crate::PrefetchingSource) spawns its speculative
/// call with `tokio::spawn` and panics when polled outside one.
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{AddressSource, CachingSource, LocalSource, PrefetchingSource};
///
/// let source = CachingSource::new(PrefetchingSource::new(LocalSource::new(xpub, version)));
/// let first_page = source.derive(0, 19).await?;
/// let second_page = source.derive(20, 39).await?; // served by the prefetch
/// ```
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Derive the addresses for indices `first_index..=last_index`
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError>;

    /// Returns a human-readable name for this source
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<S> AddressSource for Box<S>
where
    S: AddressSource + ?Sized,
{
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        (**self).derive(first_index, last_index).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait]
impl<S> AddressSource for Arc<S>
where
    S: AddressSource + ?Sized,
{
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        (**self).derive(first_index, last_index).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
