// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-process derivation strategy

use async_trait::async_trait;
use bip32::XPub;

use crate::encoding::{derive_range, AddressVersion};
use crate::errors::DeriveError;
use crate::range::{AddressRange, DerivedAddresses};
use crate::source::AddressSource;
use crate::spans;

/// Derives addresses on the calling task
///
/// The computation is synchronous; `derive` only presents it through the
/// async [`AddressSource`] contract. Holds no mutable state, so concurrent
/// calls are independent.
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{constants::versions, AddressSource, LocalSource};
///
/// let source = LocalSource::new(xpub, versions::BITCOIN_P2PKH);
/// let addresses = source.derive(0, 9).await?;
/// assert_eq!(addresses.len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct LocalSource {
    node: XPub,
    version: AddressVersion,
}

impl LocalSource {
    /// Create a strategy deriving children of `node` encoded with `version`
    pub fn new(node: XPub, version: AddressVersion) -> Self {
        Self { node, version }
    }

    /// The address version this strategy encodes with
    pub fn version(&self) -> AddressVersion {
        self.version
    }
}

#[async_trait]
impl AddressSource for LocalSource {
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        spans::derive_range(self.name(), first_index, last_index).in_scope(|| {
            let range = AddressRange::new(first_index, last_index)?;
            derive_range(&self.node, self.version, range)
        })
    }

    fn name(&self) -> &'static str {
        "LocalSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::tests::test_xpub;

    fn source() -> LocalSource {
        LocalSource::new(test_xpub(), AddressVersion::new(0))
    }

    #[tokio::test]
    async fn test_derive_returns_one_address_per_index() {
        let addresses = source().derive(5, 14).await.unwrap();
        assert_eq!(addresses.len(), 10);
    }

    #[tokio::test]
    async fn test_sub_range_matches_slice_of_larger_range() {
        let source = source();
        let all = source.derive(0, 9).await.unwrap();
        let middle = source.derive(2, 4).await.unwrap();

        assert_eq!(middle, all[2..=4].to_vec());
    }

    #[tokio::test]
    async fn test_rejects_reversed_range() {
        let err = source().derive(4, 2).await.unwrap_err();
        assert!(matches!(err, DeriveError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_rejects_hardened_range() {
        let err = source().derive(0, u32::MAX).await.unwrap_err();
        assert!(matches!(err, DeriveError::InvalidRange { .. }));
    }
}
