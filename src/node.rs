// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Serializable public key-derivation material for offloaded derivation.

use bip32::{ChildNumber, ExtendedKey, ExtendedKeyAttrs, Prefix, XPub};
use serde::{Deserialize, Serialize};

use crate::errors::DeriveError;

/// The minimal public material needed to derive children of an HD node
///
/// Captured once from an [`XPub`] when an offloaded strategy is built and
/// never mutated afterwards. Byte fields serialize as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Depth of the node in the derivation tree
    pub depth: u8,
    /// Child number of the node within its parent
    pub child_number: u32,
    /// First four bytes of the parent key's identifier
    #[serde(with = "hex::serde")]
    pub parent_fingerprint: [u8; 4],
    /// Chain code of the node
    #[serde(with = "hex::serde")]
    pub chain_code: [u8; 32],
    /// Compressed SEC1 public key of the node
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
}

impl NodeDescriptor {
    /// Capture the derivation material of an extended public key
    pub fn from_xpub(xpub: &XPub) -> Self {
        let attrs = xpub.attrs();
        Self {
            depth: attrs.depth,
            child_number: attrs.child_number.0,
            parent_fingerprint: attrs.parent_fingerprint,
            chain_code: attrs.chain_code,
            public_key: xpub.to_bytes().to_vec(),
        }
    }

    /// Rebuild the extended public key this descriptor was captured from
    pub fn to_xpub(&self) -> Result<XPub, DeriveError> {
        let key_bytes: [u8; 33] = self.public_key.as_slice().try_into().map_err(|_| {
            DeriveError::invalid_node(format!(
                "public key must be 33 bytes, got {}",
                self.public_key.len()
            ))
        })?;

        let extended = ExtendedKey {
            prefix: Prefix::XPUB,
            attrs: ExtendedKeyAttrs {
                depth: self.depth,
                parent_fingerprint: self.parent_fingerprint,
                child_number: ChildNumber(self.child_number),
                chain_code: self.chain_code,
            },
            key_bytes,
        };

        XPub::try_from(extended)
            .map_err(|e| DeriveError::invalid_node(format!("invalid public key: {e}")))
    }
}

impl From<&XPub> for NodeDescriptor {
    fn from(xpub: &XPub) -> Self {
        Self::from_xpub(xpub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::tests::test_xpub;

    #[test]
    fn test_descriptor_rebuilds_same_node() {
        let xpub = test_xpub();
        let descriptor = NodeDescriptor::from_xpub(&xpub);
        let rebuilt = descriptor.to_xpub().unwrap();

        assert_eq!(rebuilt.to_bytes(), xpub.to_bytes());
        assert_eq!(rebuilt.attrs().chain_code, xpub.attrs().chain_code);
        assert_eq!(descriptor.depth, 0);
        assert_eq!(descriptor.parent_fingerprint, [0; 4]);
    }

    #[test]
    fn test_descriptor_serializes_hex_fields() {
        let descriptor = NodeDescriptor::from_xpub(&test_xpub());
        let json = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(json["childNumber"], 0);
        assert_eq!(json["parentFingerprint"], "00000000");
        assert_eq!(json["publicKey"].as_str().unwrap().len(), 66);

        let decoded: NodeDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, descriptor);
    }

    #[test]
    fn test_rejects_truncated_public_key() {
        let mut descriptor = NodeDescriptor::from_xpub(&test_xpub());
        descriptor.public_key.truncate(32);

        assert!(matches!(
            descriptor.to_xpub(),
            Err(DeriveError::InvalidNode { .. })
        ));
    }

    #[test]
    fn test_rejects_point_not_on_curve() {
        let mut descriptor = NodeDescriptor::from_xpub(&test_xpub());
        descriptor.public_key = vec![0x05; 33];

        assert!(descriptor.to_xpub().is_err());
    }
}
