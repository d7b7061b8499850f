// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Persistable snapshot of a range cache

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::CacheError;
use crate::range::{AddressRange, DerivedAddresses};

/// Snapshot of a [`CachingSource`](super::CachingSource)'s contents
///
/// Serializes as `{ "cache": { "0-9": ["1...", ...], ... } }`. Keys use the
/// `"{first}-{last}"` encoding; no other key format is accepted on restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Cached addresses keyed by `"{first}-{last}"`
    pub cache: HashMap<String, DerivedAddresses>,
}

impl CacheRecord {
    pub(crate) fn from_entries(entries: &HashMap<AddressRange, DerivedAddresses>) -> Self {
        Self {
            cache: entries
                .iter()
                .map(|(range, addresses)| (range.to_string(), addresses.clone()))
                .collect(),
        }
    }

    /// Validate every entry and convert to range keys
    pub(crate) fn into_entries(
        self,
    ) -> Result<HashMap<AddressRange, DerivedAddresses>, CacheError> {
        self.cache
            .into_iter()
            .map(|(key, addresses)| {
                let range: AddressRange = key
                    .parse()
                    .map_err(|_| CacheError::InvalidKey { key: key.clone() })?;

                if addresses.len() != range.len() {
                    return Err(CacheError::LengthMismatch {
                        key,
                        expected: range.len(),
                        actual: addresses.len(),
                    });
                }

                Ok((range, addresses))
            })
            .collect()
    }

    /// Number of cached ranges in this snapshot
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the snapshot holds no ranges
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(CacheError::serialization_error)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        serde_json::from_str(json).map_err(CacheError::serialization_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(first: u32, last: u32) -> DerivedAddresses {
        (first..=last).map(|i| format!("A{i}")).collect()
    }

    #[test]
    fn test_json_shape() {
        let mut record = CacheRecord::default();
        record.cache.insert("0-1".to_string(), addresses(0, 1));

        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "cache": { "0-1": ["A0", "A1"] } }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            CacheRecord::from_json("{ \"entries\": [] }"),
            Err(CacheError::Serialization { .. })
        ));
    }

    #[test]
    fn test_into_entries_parses_keys() {
        let mut record = CacheRecord::default();
        record.cache.insert("10-12".to_string(), addresses(10, 12));

        let entries = record.into_entries().unwrap();
        assert_eq!(
            entries.get(&AddressRange::new(10, 12).unwrap()),
            Some(&addresses(10, 12))
        );
    }

    #[test]
    fn test_into_entries_rejects_unknown_key_format() {
        let mut record = CacheRecord::default();
        record.cache.insert("10:12".to_string(), addresses(10, 12));

        assert!(matches!(
            record.into_entries(),
            Err(CacheError::InvalidKey { key }) if key == "10:12"
        ));
    }

    #[test]
    fn test_into_entries_rejects_wrong_length() {
        let mut record = CacheRecord::default();
        record.cache.insert("0-9".to_string(), addresses(0, 4));

        assert!(matches!(
            record.into_entries(),
            Err(CacheError::LengthMismatch {
                expected: 10,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_entries_round_trip() {
        let mut entries = HashMap::new();
        entries.insert(AddressRange::new(0, 2).unwrap(), addresses(0, 2));
        entries.insert(AddressRange::new(3, 5).unwrap(), addresses(3, 5));

        let record = CacheRecord::from_entries(&entries);
        assert_eq!(record.len(), 2);
        assert!(record.cache.contains_key("3-5"));
        assert_eq!(record.into_entries().unwrap(), entries);
    }
}
