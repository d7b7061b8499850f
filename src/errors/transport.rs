// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the background worker channel.

/// Errors reported by a [`WorkerTransport`](crate::worker::WorkerTransport).
///
/// From the caller's point of view these are indistinguishable from local
/// derivation failures; they reach the caller as [`DeriveError::Transport`](crate::DeriveError::Transport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The worker is gone; the request could not be delivered.
    #[error("Worker channel is closed")]
    Closed,

    /// The worker accepted the request but dropped it without replying.
    #[error("Worker dropped the request without a response")]
    NoResponse,

    /// The worker reported a failure while handling the request.
    #[error("Worker reported an error: {message}")]
    Remote {
        /// The worker's error message
        message: String,
    },

    /// The worker replied with the wrong number of addresses.
    #[error("Malformed worker response: expected {expected} addresses, got {actual}")]
    MalformedResponse {
        /// Number of addresses in the requested range
        expected: usize,
        /// Number of addresses the worker returned
        actual: usize,
    },
}

impl TransportError {
    /// Create a `Remote` error from any displayable failure.
    pub fn remote(message: impl ToString) -> Self {
        TransportError::Remote {
            message: message.to_string(),
        }
    }
}
