// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for address range derivation.

use super::TransportError;

/// Errors that can occur while deriving a range of addresses.
///
/// Local strategies fail with [`InvalidRange`](DeriveError::InvalidRange),
/// [`Derivation`](DeriveError::Derivation) or [`InvalidNode`](DeriveError::InvalidNode).
/// Offloaded strategies additionally surface [`Transport`](DeriveError::Transport)
/// failures, which include errors reported by the worker itself.
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{AddressSource, DeriveError};
///
/// match source.derive(0, 9).await {
///     Ok(addresses) => println!("{} addresses", addresses.len()),
///     Err(DeriveError::InvalidRange { reason, .. }) => eprintln!("bad range: {reason}"),
///     Err(DeriveError::Transport(e)) => eprintln!("worker failed: {e}"),
///     Err(e) => eprintln!("derivation failed: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    /// The requested range is empty, reversed, or reaches into hardened indices.
    #[error("Invalid address range {first}-{last}: {reason}")]
    InvalidRange {
        /// First index of the requested range
        first: u32,
        /// Last index of the requested range
        last: u32,
        /// Why the range was rejected
        reason: String,
    },

    /// Child key derivation failed for a specific index.
    ///
    /// This happens with negligible probability for valid keys (the derived
    /// tweak falls outside the curve order).
    #[error("Key derivation failed at index {index}: {source}")]
    Derivation {
        /// Index whose child key could not be derived
        index: u32,
        /// The underlying BIP32 error
        #[source]
        source: bip32::Error,
    },

    /// The node descriptor does not describe a valid extended public key.
    #[error("Invalid node descriptor: {reason}")]
    InvalidNode {
        /// Why the descriptor was rejected
        reason: String,
    },

    /// The background worker or its channel failed.
    #[error("Worker transport error: {0}")]
    Transport(#[from] TransportError),

    /// A spawned derivation task panicked or was aborted.
    #[error("Derivation task failed: {details}")]
    Task {
        /// Details about the task failure
        details: String,
    },
}

impl DeriveError {
    /// Create an `InvalidRange` error with a reason.
    pub fn invalid_range(first: u32, last: u32, reason: impl Into<String>) -> Self {
        DeriveError::InvalidRange {
            first,
            last,
            reason: reason.into(),
        }
    }

    /// Create an `InvalidNode` error with a reason.
    pub fn invalid_node(reason: impl Into<String>) -> Self {
        DeriveError::InvalidNode {
            reason: reason.into(),
        }
    }

    /// Create a `Task` error from a join failure.
    pub fn task(err: tokio::task::JoinError) -> Self {
        DeriveError::Task {
            details: err.to_string(),
        }
    }
}
