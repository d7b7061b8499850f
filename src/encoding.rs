// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Child key derivation and transparent address encoding
//!
//! Addresses are `base58check(version || RIPEMD160(SHA256(pubkey)))` over the
//! compressed child public key. The version prefix selects the network and
//! address kind (Bitcoin P2PKH, Litecoin, Zcash t-addresses, ...).

use std::fmt;

use bip32::{ChildNumber, XPub};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::DeriveError;
use crate::range::{AddressRange, DerivedAddresses};

/// Address version tag identifying the encoding prefix
///
/// The prefix bytes are the minimal big-endian encoding of the value, so
/// single-byte versions (Bitcoin `0x00`) and two-byte versions (Zcash
/// `0x1cb8`) share one representation.
///
/// # Examples
///
/// ```
/// use hdrange::AddressVersion;
///
/// assert_eq!(AddressVersion::new(0x00).prefix(), vec![0x00]);
/// assert_eq!(AddressVersion::new(0x1cb8).prefix(), vec![0x1c, 0xb8]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressVersion(u32);

impl AddressVersion {
    /// Create a version tag from its numeric value
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Numeric value of this version tag
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Prefix bytes prepended to the key hash
    pub fn prefix(&self) -> Vec<u8> {
        let bytes = self.0.to_be_bytes();
        let skip = bytes.iter().take(3).take_while(|b| **b == 0).count();
        bytes[skip..].to_vec()
    }
}

impl fmt::Display for AddressVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl From<u32> for AddressVersion {
    fn from(version: u32) -> Self {
        Self(version)
    }
}

/// Encode a compressed public key as a base58check address
pub fn encode_address(public_key: &[u8], version: AddressVersion) -> String {
    let hash = Ripemd160::digest(Sha256::digest(public_key));

    let mut payload = version.prefix();
    payload.extend_from_slice(&hash);
    bs58::encode(payload).with_check().into_string()
}

/// Derive the address of a single non-hardened child
pub fn derive_address(
    node: &XPub,
    version: AddressVersion,
    index: u32,
) -> Result<String, DeriveError> {
    let child_number = ChildNumber::new(index, false)
        .map_err(|source| DeriveError::Derivation { index, source })?;
    let child = node
        .derive_child(child_number)
        .map_err(|source| DeriveError::Derivation { index, source })?;

    Ok(encode_address(&child.to_bytes(), version))
}

/// Derive the addresses of every child in `range`, in ascending index order
///
/// Shared by the in-process strategy and the background worker so both
/// produce identical output for the same node and version.
pub fn derive_range(
    node: &XPub,
    version: AddressVersion,
    range: AddressRange,
) -> Result<DerivedAddresses, DeriveError> {
    range
        .indices()
        .map(|index| derive_address(node, version, index))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bip32::XPrv;

    /// BIP32 test vector 1 seed
    pub(crate) const TEST_SEED: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];

    pub(crate) fn test_xpub() -> XPub {
        XPrv::new(TEST_SEED).unwrap().public_key()
    }

    #[test]
    fn test_prefix_is_minimal_big_endian() {
        assert_eq!(AddressVersion::new(0).prefix(), vec![0x00]);
        assert_eq!(AddressVersion::new(0x6f).prefix(), vec![0x6f]);
        assert_eq!(AddressVersion::new(0x1cb8).prefix(), vec![0x1c, 0xb8]);
        assert_eq!(AddressVersion::new(0x0102_0304).prefix(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_encode_master_key_of_test_vector_1() {
        // BIP32 test vector 1, chain m
        let public_key =
            hex::decode("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2")
                .unwrap();
        assert_eq!(
            encode_address(&public_key, AddressVersion::new(0)),
            "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma"
        );
    }

    #[test]
    fn test_address_carries_version_prefix() {
        let address = derive_address(&test_xpub(), AddressVersion::new(0x1cb8), 0).unwrap();
        let decoded = bs58::decode(&address).with_check(None).into_vec().unwrap();

        assert_eq!(&decoded[..2], &[0x1c, 0xb8]);
        assert_eq!(decoded.len(), 2 + 20);
    }

    #[test]
    fn test_derive_range_is_ordered_and_deterministic() {
        let node = test_xpub();
        let version = AddressVersion::new(0);

        let all = derive_range(&node, version, AddressRange::new(0, 9).unwrap()).unwrap();
        let middle = derive_range(&node, version, AddressRange::new(2, 4).unwrap()).unwrap();

        assert_eq!(all.len(), 10);
        assert_eq!(middle, all[2..=4].to_vec());
        assert_eq!(middle[0], derive_address(&node, version, 2).unwrap());
    }

    #[test]
    fn test_versions_produce_different_addresses() {
        let node = test_xpub();
        let mainnet = derive_address(&node, AddressVersion::new(0x00), 5).unwrap();
        let testnet = derive_address(&node, AddressVersion::new(0x6f), 5).unwrap();

        assert_ne!(mainnet, testnet);
        assert!(mainnet.starts_with('1'));
    }
}
