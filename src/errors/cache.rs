// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for cache snapshots.

/// Errors that can occur while restoring or (de)serializing a
/// [`CacheRecord`](crate::CacheRecord).
///
/// A rejected record never modifies the cache it was offered to.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A key does not follow the `"{first}-{last}"` encoding.
    #[error("Invalid cache key '{key}'")]
    InvalidKey {
        /// The offending key
        key: String,
    },

    /// A cached value does not have one address per index of its key's range.
    #[error("Cache entry '{key}' holds {actual} addresses, expected {expected}")]
    LengthMismatch {
        /// The offending key
        key: String,
        /// Length of the key's range
        expected: usize,
        /// Number of addresses stored under the key
        actual: usize,
    },

    /// Error serializing or deserializing a cache record.
    #[error("Serialization error: {details}")]
    Serialization {
        /// Details about the serialization error
        details: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Create a `Serialization` error from a serde_json error.
    pub fn serialization_error(source: serde_json::Error) -> Self {
        CacheError::Serialization {
            details: source.to_string(),
            source,
        }
    }
}
